use serde::{Deserialize, Serialize};

/// Payout granted by completing a task or claiming a goal.
///
/// Experience always applies. The optional resource amounts raise the
/// matching pool's ceiling *and* refill toward it; see
/// `grimoire-core::progression` for the exact order. An absent amount and a
/// zero amount are equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rewards {
    pub experience: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mana: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mind: Option<u32>,
}
