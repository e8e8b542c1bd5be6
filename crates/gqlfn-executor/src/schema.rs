//! The example schema: a single `sysInfo` field.

use async_graphql::{EmptyMutation, EmptySubscription, Object, Schema};

pub type AppSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Operating system, CPU architecture and service version of the host
    /// answering the query.
    async fn sys_info(&self) -> String {
        sys_info()
    }
}

pub fn build_schema() -> AppSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription).finish()
}

pub fn sys_info() -> String {
    format!(
        "{}/{} gqlfn {}",
        std::env::consts::OS,
        std::env::consts::ARCH,
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sys_info_names_platform() {
        let info = sys_info();
        assert!(info.starts_with(std::env::consts::OS));
        assert!(info.contains(std::env::consts::ARCH));
    }
}
