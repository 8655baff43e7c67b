pub(crate) mod users_model;
pub(crate) mod users_repository;
pub(crate) mod users_service;
pub(crate) mod users_traits;

pub use users_model::{NewUser, OnboardingStage, User};
pub use users_repository::{ActivityEvent, UserRepository};
pub use users_service::UserService;
pub use users_traits::UserServiceTrait;
