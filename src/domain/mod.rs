pub mod deal;
pub mod deal_category;
pub mod new_subscriber;
pub mod subscriber_email;
