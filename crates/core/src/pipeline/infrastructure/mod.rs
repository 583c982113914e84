pub mod threaded_roi_executor;
