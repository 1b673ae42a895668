//! Typed access to the key-value store, one repository per record kind.

pub mod profile_repo;
pub mod program_repo;
pub mod progress_repo;
pub mod reward_repo;

pub use profile_repo::ProfileRepo;
pub use program_repo::ProgramRepo;
pub use progress_repo::ProgressRepo;
pub use reward_repo::RewardRepo;
