//! Member management endpoints

use axum::{
    extract::{Path, State},
    response::Redirect,
    Form, Json,
};

use crate::{
    error::AppResult,
    models::member::{Member, MemberForm},
};

/// List members
#[utoipa::path(
    get,
    path = "/members",
    tag = "members",
    responses(
        (status = 200, description = "All members, by id", body = Vec<Member>)
    )
)]
pub async fn list_members(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Member>>> {
    let members = state.services.members.list().await?;
    Ok(Json(members))
}

/// Register a member
#[utoipa::path(
    post,
    path = "/members",
    tag = "members",
    request_body(content = MemberForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created, redirect to /members"),
        (status = 400, description = "Invalid form"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_member(
    State(state): State<crate::AppState>,
    Form(form): Form<MemberForm>,
) -> AppResult<Redirect> {
    state.services.members.create(&form).await?;
    Ok(Redirect::to("/members"))
}

/// Edit form for a member
#[utoipa::path(
    get,
    path = "/members/update/{id}",
    tag = "members",
    params(("id" = i64, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member to edit", body = Member),
        (status = 404, description = "Member not found")
    )
)]
pub async fn edit_member(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Member>> {
    let member = state.services.members.get_by_id(id).await?;
    Ok(Json(member))
}

/// Apply a member update
#[utoipa::path(
    post,
    path = "/members/update/{id}",
    tag = "members",
    params(("id" = i64, Path, description = "Member ID")),
    request_body(content = MemberForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated, redirect to /members"),
        (status = 400, description = "Invalid form"),
        (status = 404, description = "Member not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_member(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Form(form): Form<MemberForm>,
) -> AppResult<Redirect> {
    state.services.members.update(id, &form).await?;
    Ok(Redirect::to("/members"))
}

/// Delete a member
#[utoipa::path(
    get,
    path = "/members/delete/{id}",
    tag = "members",
    params(("id" = i64, Path, description = "Member ID")),
    responses(
        (status = 303, description = "Deleted, redirect to /members"),
        (status = 404, description = "Member not found"),
        (status = 409, description = "Member has loan history")
    )
)]
pub async fn delete_member(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Redirect> {
    state.services.members.delete(id).await?;
    Ok(Redirect::to("/members"))
}
