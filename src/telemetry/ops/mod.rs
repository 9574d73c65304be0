pub mod init;
pub mod feed;
pub mod refresh;
pub mod items;
pub mod serve;
