//! C++ header frontend

pub mod parser;

pub use parser::CppHeaderParser;
