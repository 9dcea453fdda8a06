pub mod analysis;
pub mod chat;
pub mod command;
pub mod evidence;
pub mod form;
mod lenient;
pub mod text_list;
