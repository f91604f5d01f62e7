pub mod corpus;
pub mod encoding;
pub mod fetch;
pub mod matching;
pub mod review;
pub mod session;
pub mod suggest;
