mod common;
mod dashboard;
mod directory;
