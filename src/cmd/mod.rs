//! CLI command implementations.
//!
//! Each submodule owns one `Commands` variant:
//!
//! | Module          | Commands handled                                   |
//! |-----------------|-----------------------------------------------------|
//! | `show`          | `Show`                                             |
//! | `replay`        | `Replay`                                           |
//! | `config`        | `Config`                                           |

pub mod config;
pub mod replay;
pub mod show;

pub use config::cmd_config;
pub use replay::cmd_replay;
pub use show::cmd_show;
