pub mod delete_user;
pub mod get_user;
pub mod get_users;
pub mod login_user;
pub mod register_user;
pub mod update_user;
pub mod validate_user_token;
