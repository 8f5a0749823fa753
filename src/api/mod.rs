pub mod clarifai_api;

pub use clarifai_api::ClarifaiApi;
