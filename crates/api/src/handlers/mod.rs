pub mod analytics;
pub mod embed;
pub mod export;
pub mod public;
pub mod signup;
pub mod waitlists;
pub mod widget;
