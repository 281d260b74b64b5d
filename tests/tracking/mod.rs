mod collection_scenarios;
mod config_loading;
mod test_utils;
mod untrack_scenarios;
