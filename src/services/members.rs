//! Member management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::member::{Member, MemberForm},
    repository::Repository,
};

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
}

impl MembersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Member>> {
        self.repository.members.list().await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Member> {
        self.repository.members.get_by_id(id).await
    }

    pub async fn create(&self, form: &MemberForm) -> AppResult<Member> {
        let form = form.trimmed();
        form.validate()?;
        let member = self.repository.members.create(&form).await?;
        tracing::info!("Member {} registered", member.id);
        Ok(member)
    }

    pub async fn update(&self, id: i64, form: &MemberForm) -> AppResult<Member> {
        let form = form.trimmed();
        form.validate()?;
        self.repository.members.update(id, &form).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.members.delete(id).await?;
        tracing::info!("Member {} deleted", id);
        Ok(())
    }
}
