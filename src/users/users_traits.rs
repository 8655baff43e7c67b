use async_trait::async_trait;

use crate::errors::Result;
use crate::users::users_model::{NewUser, User};

#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    fn get_user(&self, user_id: &str) -> Result<User>;

    async fn register(&self, new_user: NewUser) -> Result<User>;

    async fn record_login(&self, user_id: &str) -> Result<User>;

    /// Deletes the user and every record they own in one transaction.
    async fn delete_account(&self, user_id: &str) -> Result<()>;
}
