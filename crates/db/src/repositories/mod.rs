//! Repository layer.
//!
//! Each repository is a zero-sized struct with async methods. Read paths
//! take `&PgPool`; mutations that participate in a multi-step action take
//! `&mut PgConnection` so handlers can run them inside one transaction.
//! Balance debits are conditional updates (`... WHERE balance >= $n`), so a
//! stale affordability check can never double-spend.

pub mod group_repo;
pub mod idol_repo;
pub mod manager_repo;
pub mod player_repo;
pub mod promotion_repo;
pub mod song_repo;
pub mod upgrade_repo;
pub mod user_repo;

pub use group_repo::GroupRepo;
pub use idol_repo::IdolRepo;
pub use manager_repo::ManagerRepo;
pub use player_repo::PlayerRepo;
pub use promotion_repo::PromotionRepo;
pub use song_repo::SongRepo;
pub use upgrade_repo::UpgradeRepo;
pub use user_repo::UserRepo;
