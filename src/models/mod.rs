pub mod review;
pub mod review_list;
