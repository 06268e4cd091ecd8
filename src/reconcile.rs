//! Decides which local accounts need the user's attention.

use std::collections::BTreeSet;

use crate::api::ServerMessage;
use crate::store::LocalLoginIndex;

/// Usernames with a pending voucher or OTP reset.
///
/// Messages about logins that are not in `index` are dropped: the server may
/// still hold notices for a login that was removed from this device.
pub fn reconcile(index: &LocalLoginIndex, messages: &[ServerMessage]) -> BTreeSet<String> {
    messages
        .iter()
        .filter(|message| message.needs_attention())
        .filter_map(|message| index.username(&message.login_id))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> LocalLoginIndex {
        [("L1", "alice"), ("L2", "bob")].into_iter().collect()
    }

    fn message(login_id: &str, vouchers: usize, otp: bool) -> ServerMessage {
        ServerMessage {
            login_id: login_id.to_string(),
            pending_voucher_count: vouchers,
            otp_reset_pending: otp,
        }
    }

    fn names(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pending_voucher_flags_account() {
        let verdict = reconcile(&index(), &[message("L1", 1, false)]);
        assert_eq!(verdict, names(&["alice"]));
    }

    #[test]
    fn test_otp_reset_flags_account() {
        let verdict = reconcile(&index(), &[message("L1", 0, true)]);
        assert_eq!(verdict, names(&["alice"]));
    }

    #[test]
    fn test_no_messages_no_verdict() {
        assert!(reconcile(&index(), &[]).is_empty());
    }

    #[test]
    fn test_quiet_messages_are_ignored() {
        let verdict = reconcile(&index(), &[message("L1", 0, false), message("L2", 0, false)]);
        assert!(verdict.is_empty());
    }

    #[test]
    fn test_unknown_login_contributes_nothing() {
        let verdict = reconcile(&index(), &[message("L9", 3, true), message("L2", 1, true)]);
        assert_eq!(verdict, names(&["bob"]));
    }

    #[test]
    fn test_duplicate_messages_collapse() {
        let verdict = reconcile(&index(), &[message("L1", 1, false), message("L1", 0, true)]);
        assert_eq!(verdict.len(), 1);
    }

    #[test]
    fn test_verdict_is_subset_of_index_usernames() {
        let index = index();
        let messages: Vec<ServerMessage> = ["L1", "L2", "L3", "", "alice"]
            .iter()
            .flat_map(|id| [message(id, 1, false), message(id, 0, true), message(id, 0, false)])
            .collect();

        let known: BTreeSet<String> = index.usernames().map(str::to_string).collect();
        let verdict = reconcile(&index, &messages);
        assert!(verdict.is_subset(&known));
        assert_eq!(verdict, known);
    }

    #[test]
    fn test_empty_index_never_reports() {
        let verdict = reconcile(&LocalLoginIndex::new(), &[message("L1", 5, true)]);
        assert!(verdict.is_empty());
    }
}
