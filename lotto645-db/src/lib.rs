pub mod corpus;
pub mod models;
