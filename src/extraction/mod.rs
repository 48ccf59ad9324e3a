//! Text-level extraction of definitions from source files and doc pages.

pub mod markdown;
pub mod python;

pub use markdown::extract_documented_objects;
pub use python::{
    extract_python, neutralize, ExtractedClass, ExtractedFunction, MethodSignature,
    PythonExtraction,
};
