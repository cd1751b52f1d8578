pub(crate) mod loop_heartbeats;
