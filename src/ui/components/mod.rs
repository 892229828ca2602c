pub mod activity_panel;
pub mod compose;
pub mod map_view;
pub mod message_list;
pub mod sidebar;
pub mod sos_list;
pub mod watch_panel;
