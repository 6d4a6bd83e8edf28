mod common;
mod qualifier;
mod registry;
mod resolver;
