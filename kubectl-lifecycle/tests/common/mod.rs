#![allow(dead_code)]

pub mod fixtures;
pub mod mock_eol;
pub mod mock_http;
pub mod mock_k8s;
