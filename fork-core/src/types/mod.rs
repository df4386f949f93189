pub mod block;
pub mod script;
pub mod transaction;

pub use block::{Block, BlockHeader};
pub use script::{OpCode, Script};
pub use transaction::{OutPoint, Transaction, TransactionInput, TransactionOutput};
