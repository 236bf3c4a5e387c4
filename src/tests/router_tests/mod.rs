mod hook_tests;
mod settings_tests;
