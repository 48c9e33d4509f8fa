mod test_disconnect_triggers_leave;
mod test_join_returns_snapshot;
mod test_unreachable_member_is_dropped;
