pub mod block;
pub mod blockchain;
pub mod session;

pub mod prelude {
    pub use super::block::prelude::*;
    pub use super::blockchain::prelude::*;
    pub use super::session::prelude::*;
}
