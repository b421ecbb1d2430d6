mod feedback_query;
mod feedback_record;
mod feedback_stats;
mod user_record;

pub use feedback_query::FeedbackQuery;
pub use feedback_record::FeedbackRecord;
pub use feedback_stats::FeedbackStats;
pub use user_record::UserRecord;
