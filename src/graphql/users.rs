use std::sync::Arc;

use async_graphql::{
    Context, CustomValidator, Error, InputObject, InputValueError, Object, Result, SimpleObject,
};
use axum::http::header::SET_COOKIE;

use crate::{
    auth::{
        AdminGuard, AuthGuard, TokenPayload, clear_refresh_cookie, hash_password, refresh_cookie,
        verify_password,
    },
    error::AppError,
    graphql::{
        MutationBasicResponse,
        pagination::{GetItemsInput, resolve_page},
    },
    models::{User, parse_object_id},
    services::users::{profile_update, users_filter},
    state::AppState,
};

#[derive(InputObject)]
pub struct AddUserInput {
    #[graphql(validator(min_length = 3, max_length = 20))]
    pub name: String,
    #[graphql(validator(email))]
    pub email: String,
    #[graphql(validator(min_length = 8, max_length = 20, custom = "PasswordPolicy"))]
    pub password: String,
}

#[derive(InputObject)]
pub struct UpdateUserProfileInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub is_admin: Option<bool>,
}

#[derive(InputObject)]
pub struct LoginInput {
    #[graphql(validator(email))]
    pub email: String,
    pub password: String,
}

#[derive(SimpleObject)]
pub struct GetUsersResponse {
    pub users: Vec<User>,
    pub page: u64,
    pub pages: u64,
}

#[derive(SimpleObject)]
pub struct LoginResponse {
    pub access_token: String,
}

pub struct PasswordPolicy;

impl CustomValidator<String> for PasswordPolicy {
    fn check(&self, value: &String) -> Result<(), InputValueError<String>> {
        if is_strong_password(value) {
            Ok(())
        } else {
            Err(InputValueError::custom(
                "Password must contain at least a lowercase letter, a uppercase letter, a number and a special character ( ! @ # $ % )",
            ))
        }
    }
}

pub fn is_strong_password(password: &str) -> bool {
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| "!@#$%".contains(c));

    has_lower && has_upper && has_digit && has_special
}

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    #[graphql(guard = "AuthGuard.and(AdminGuard)")]
    async fn get_users(
        &self,
        ctx: &Context<'_>,
        get_users_input: GetItemsInput,
    ) -> Result<GetUsersResponse> {
        let state = ctx.data::<Arc<AppState>>()?;

        let filter = users_filter(get_users_input.keyword.as_deref());
        let count = state.users.count(filter.clone()).await?;

        let page = resolve_page(count, get_users_input.page_size, get_users_input.page_number);
        let users = state.users.find_page(filter, page.skip, page.limit).await?;

        Ok(GetUsersResponse {
            users,
            page: page.page,
            pages: page.pages,
        })
    }

    #[graphql(guard = "AuthGuard")]
    async fn get_user_profile(&self, ctx: &Context<'_>) -> Result<User> {
        let state = ctx.data::<Arc<AppState>>()?;
        let payload = ctx.data::<TokenPayload>()?;

        let user = state
            .users
            .find_by_id(payload.user_id)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        Ok(user)
    }

    #[graphql(guard = "AuthGuard.and(AdminGuard)")]
    async fn get_user(&self, ctx: &Context<'_>, user_id: String) -> Result<User> {
        let state = ctx.data::<Arc<AppState>>()?;

        let user = state
            .users
            .find_by_id(parse_object_id(&user_id)?)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        Ok(user)
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    /// Public registration; accounts never start as admins.
    async fn add_user(&self, ctx: &Context<'_>, add_user_input: AddUserInput) -> Result<User> {
        let state = ctx.data::<Arc<AppState>>()?;

        let hashed = hash_password(&add_user_input.password)?;
        let user = state
            .users
            .create(User::new(add_user_input.name, add_user_input.email, hashed))
            .await?;

        Ok(user)
    }

    #[graphql(guard = "AuthGuard")]
    async fn update_user_profile(
        &self,
        ctx: &Context<'_>,
        update_body: UpdateUserProfileInput,
    ) -> Result<User> {
        let state = ctx.data::<Arc<AppState>>()?;
        let payload = ctx.data::<TokenPayload>()?;

        let set = profile_update(update_body.name, update_body.email, update_body.password)?;

        let user = state
            .users
            .update(payload.user_id, set)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        Ok(user)
    }

    #[graphql(guard = "AuthGuard.and(AdminGuard)")]
    async fn update_user(
        &self,
        ctx: &Context<'_>,
        user_id: String,
        update_body: UpdateUserInput,
    ) -> Result<User> {
        let state = ctx.data::<Arc<AppState>>()?;

        let mut set = profile_update(update_body.name, update_body.email, None)?;
        if let Some(is_admin) = update_body.is_admin {
            set.insert("isAdmin", is_admin);
        }

        let user = state
            .users
            .update(parse_object_id(&user_id)?, set)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        Ok(user)
    }

    #[graphql(guard = "AuthGuard.and(AdminGuard)")]
    async fn delete_user(
        &self,
        ctx: &Context<'_>,
        user_id: String,
    ) -> Result<MutationBasicResponse> {
        let state = ctx.data::<Arc<AppState>>()?;

        state
            .users
            .delete_by_id(parse_object_id(&user_id)?)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        Ok(MutationBasicResponse::new("User deleted"))
    }

    /// Verifies credentials, rotates the refresh token version and
    /// plants the refresh cookie. Only the access token goes into the
    /// response body.
    async fn login(&self, ctx: &Context<'_>, login_input: LoginInput) -> Result<LoginResponse> {
        let state = ctx.data::<Arc<AppState>>()?;

        let user = state
            .users
            .find_by_email(&login_input.email)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        if !verify_password(&login_input.password, &user.password)? {
            return Err(Error::new("Wrong credentials"));
        }

        let user_id = user.id.ok_or(AppError::InvalidId)?;

        // rotate first, then sign with the stored version so the new
        // cookie is the only live refresh lineage
        let user = state
            .users
            .bump_refresh_token_version(user_id)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        let access_token = state.auth.sign_access_token(user_id, user.is_admin)?;
        let refresh_token =
            state
                .auth
                .sign_refresh_token(user_id, user.is_admin, user.refresh_token_version)?;

        ctx.insert_http_header(SET_COOKIE, refresh_cookie(&refresh_token));

        Ok(LoginResponse { access_token })
    }

    async fn logout(&self, ctx: &Context<'_>) -> Result<MutationBasicResponse> {
        ctx.insert_http_header(SET_COOKIE, clear_refresh_cookie());

        Ok(MutationBasicResponse::new("Logout success"))
    }

    /// Invalidates every refresh token the target user holds.
    #[graphql(guard = "AuthGuard.and(AdminGuard)")]
    async fn revoke_refresh_token(
        &self,
        ctx: &Context<'_>,
        user_id: String,
    ) -> Result<MutationBasicResponse> {
        let state = ctx.data::<Arc<AppState>>()?;

        state
            .users
            .bump_refresh_token_version(parse_object_id(&user_id)?)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        Ok(MutationBasicResponse::new("Token revoked"))
    }
}

#[cfg(test)]
mod tests {
    use super::is_strong_password;

    #[test]
    fn test_accepts_compliant_password() {
        assert!(is_strong_password("P4ssw0rd!"));
        assert!(is_strong_password("aB3$xxxx"));
    }

    #[test]
    fn test_rejects_missing_classes() {
        assert!(!is_strong_password("p4ssw0rd!")); // no uppercase
        assert!(!is_strong_password("P4SSW0RD!")); // no lowercase
        assert!(!is_strong_password("Password!")); // no digit
        assert!(!is_strong_password("P4ssw0rd")); // no special
    }

    #[test]
    fn test_only_listed_specials_count() {
        assert!(!is_strong_password("P4ssw0rd^"));
        assert!(is_strong_password("P4ssw0rd%"));
    }
}
