use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    auth::AuthService,
    entities::{user, Order, User, UserModel},
    errors::ServiceError,
    events::{Event, EventSender},
    services::catalog::ListParams,
};

/// Account registration, credential checks, and the admin user CRUD.
#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
    auth: Arc<AuthService>,
    event_sender: Arc<EventSender>,
}

impl UserService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        auth: Arc<AuthService>,
        event_sender: Arc<EventSender>,
    ) -> Self {
        Self {
            db,
            auth,
            event_sender,
        }
    }

    /// Registers a new account through the public signup form. Self-service
    /// registration never grants the admin flag.
    #[instrument(skip(self, input))]
    pub async fn register(&self, input: RegisterInput) -> Result<UserModel, ServiceError> {
        self.create_user(CreateUserInput {
            name: input.name,
            email: input.email,
            password: input.password,
            is_admin: false,
        })
        .await
    }

    /// Creates an account, admin flag included. Email uniqueness is enforced
    /// here with a `Conflict` before the database constraint would fire.
    #[instrument(skip(self, input))]
    pub async fn create_user(&self, input: CreateUserInput) -> Result<UserModel, ServiceError> {
        input.validate()?;

        let existing = User::find()
            .filter(user::Column::Email.eq(&input.email))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "User with email '{}' already exists",
                input.email
            )));
        }

        let password_hash = self.auth.hash_password(&input.password)?;
        let user = user::ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            password_hash: Set(password_hash),
            is_admin: Set(input.is_admin),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let user = user.insert(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::UserRegistered(user.id))
            .await;
        info!(user_id = user.id, "user registered");
        Ok(user)
    }

    /// Checks credentials, returning the user on success. Unknown email and
    /// wrong password produce the same error so accounts are not enumerable.
    #[instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserModel, ServiceError> {
        let user = User::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("invalid credentials".to_string()))?;

        if !self.auth.verify_password(password, &user.password_hash)? {
            return Err(ServiceError::Unauthorized(
                "invalid credentials".to_string(),
            ));
        }
        Ok(user)
    }

    pub async fn get_user(&self, user_id: i32) -> Result<UserModel, ServiceError> {
        User::find_by_id(user_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))
    }

    #[instrument(skip(self))]
    pub async fn list_users(
        &self,
        params: &ListParams,
    ) -> Result<(Vec<UserModel>, u64), ServiceError> {
        let mut query = User::find();
        if let Some(search) = params.search_term() {
            query = query.filter(
                user::Column::Email
                    .contains(&search)
                    .or(user::Column::Name.contains(&search)),
            );
        }
        query = match params.sort_by.as_deref() {
            Some("email") if params.descending() => query.order_by_desc(user::Column::Email),
            Some("email") => query.order_by_asc(user::Column::Email),
            Some("name") if params.descending() => query.order_by_desc(user::Column::Name),
            Some("name") => query.order_by_asc(user::Column::Name),
            _ => query.order_by_asc(user::Column::Id),
        };

        let paginator = query.paginate(&*self.db, params.per_page());
        let total = paginator.num_items().await?;
        let users = paginator.fetch_page(params.zero_based_page()).await?;
        Ok((users, total))
    }

    /// Admin update of profile fields and the admin flag. Email changes keep
    /// the uniqueness guarantee.
    #[instrument(skip(self))]
    pub async fn update_user(
        &self,
        user_id: i32,
        input: UpdateUserInput,
    ) -> Result<UserModel, ServiceError> {
        input.validate()?;
        let user = self.get_user(user_id).await?;

        if let Some(email) = &input.email {
            let duplicate = User::find()
                .filter(user::Column::Email.eq(email))
                .filter(user::Column::Id.ne(user_id))
                .one(&*self.db)
                .await?;
            if duplicate.is_some() {
                return Err(ServiceError::Conflict(format!(
                    "User with email '{}' already exists",
                    email
                )));
            }
        }

        let mut user: user::ActiveModel = user.into();
        if let Some(name) = input.name {
            user.name = Set(name);
        }
        if let Some(email) = input.email {
            user.email = Set(email);
        }
        if let Some(is_admin) = input.is_admin {
            user.is_admin = Set(is_admin);
        }
        user.update(&*self.db).await.map_err(Into::into)
    }

    /// Deletes an account. Accounts with order history cannot be removed;
    /// orders are kept forever and must stay attributable.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: i32) -> Result<(), ServiceError> {
        let user = self.get_user(user_id).await?;

        let order_count = user.find_related(Order).count(&*self.db).await?;
        if order_count > 0 {
            return Err(ServiceError::Conflict(format!(
                "User {} has {} orders and cannot be deleted",
                user_id, order_count
            )));
        }

        user.delete(&*self.db).await?;
        info!(user_id, "user deleted");
        Ok(())
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 5, message = "password must be at least 5 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 5, message = "password must be at least 5 characters"))]
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub is_admin: Option<bool>,
}
