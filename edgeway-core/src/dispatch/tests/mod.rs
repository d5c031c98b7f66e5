mod background_tests;
mod redirect_mode_tests;
