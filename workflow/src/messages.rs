//! The notifications shown to the operator.

use tixgate_notify::Notification;

pub const ERROR_TITLE: &str = "Error";
pub const UNAUTHORIZED_TITLE: &str = "Unauthorized";
pub const IN_PROGRESS_TITLE: &str = "Transaction in progress";
pub const FAILED_TITLE: &str = "Transaction Failed";
pub const SUCCESS_TITLE: &str = "Transaction Successful";

pub const UNAUTHORIZED: &str = "You are not authorized to access this page";
pub const INVALID_TOKEN_ID: &str = "Invalid Token ID";
pub const ALREADY_EXPIRED: &str = "Ticket already expired";
pub const IN_PROGRESS: &str = "Please wait while your transaction is being processed...";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong. Please try again.";
pub const EXPIRED_SUCCESSFULLY: &str = "Ticket expired successfully!";

pub fn unauthorized() -> Notification {
    Notification::new(UNAUTHORIZED_TITLE, UNAUTHORIZED).destructive()
}

pub fn invalid_token_id() -> Notification {
    Notification::new(ERROR_TITLE, INVALID_TOKEN_ID).destructive()
}

pub fn already_expired() -> Notification {
    Notification::new(ERROR_TITLE, ALREADY_EXPIRED).destructive()
}

pub fn in_progress() -> Notification {
    Notification::new(IN_PROGRESS_TITLE, IN_PROGRESS).indefinite()
}

pub fn transaction_failed() -> Notification {
    Notification::new(FAILED_TITLE, SOMETHING_WENT_WRONG).destructive()
}

pub fn transaction_successful() -> Notification {
    Notification::new(SUCCESS_TITLE, EXPIRED_SUCCESSFULLY)
}

pub fn something_went_wrong() -> Notification {
    Notification::new(ERROR_TITLE, SOMETHING_WENT_WRONG).destructive()
}
