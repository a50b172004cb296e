pub mod settle;

pub mod initialize;
pub mod open;
pub mod deposit;
pub mod withdraw;
pub mod withdraw_private;
pub mod update_rate;
pub mod close;
pub mod force_close;
pub mod set_paused;
pub mod configure;
pub mod deposit_to_yield;
pub mod recall_from_yield;
pub mod claim_yield;

pub use initialize::*;
pub use open::*;
pub use deposit::*;
pub use withdraw::*;
pub use withdraw_private::*;
pub use update_rate::*;
pub use close::*;
pub use force_close::*;
pub use set_paused::*;
pub use configure::*;
pub use deposit_to_yield::*;
pub use recall_from_yield::*;
pub use claim_yield::*;
