pub mod activate;
pub mod config;
pub mod languages;
pub mod list;
pub mod localize;
pub mod publish;
pub mod scaffold;
pub mod serve;
