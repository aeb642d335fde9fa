mod utils;

mod test_config;
mod test_escape;
mod test_level;
mod test_pool;
mod test_sampler;
