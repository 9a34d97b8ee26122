pub mod jwt_token_gate;
pub mod record_table;
pub mod seed;
