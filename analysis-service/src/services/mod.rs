pub mod test_wiser_service;
