pub mod header;
pub mod song_list;
pub mod upload_panel;
