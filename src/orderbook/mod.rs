//! Order book module.
//!
//! ## Architecture
//!
//! Each asset gets its own [`AssetBook`] with:
//!
//! - **Slab-based storage**: O(1) node insertion, removal, and lookup
//! - **Price levels**: Orders grouped by price using BTreeMap
//! - **Price-time priority**: arrival-ordered queue at each price level
//!
//! ## Components
//!
//! - [`OrderNode`]: Shared order handle plus linked-list pointers
//! - [`PriceLevel`]: Collection of orders at a single price point
//! - [`AssetBook`]: Bid and ask sides for one asset
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Insert order | O(log n) |
//! | Remove order | O(1) + level cleanup |
//! | Best bid/ask | O(log n) |

pub mod node;
pub mod level;
pub mod book;

pub use node::OrderNode;
pub use level::PriceLevel;
pub use book::AssetBook;
