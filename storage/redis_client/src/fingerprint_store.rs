use crate::client::Client;
use anyhow::Context;
use async_trait::async_trait;
use availability::contracts::{StateGateway, StateKey};
use availability::fingerprint::Fingerprint;
use lazy_static::lazy_static;
use redis::Script;

const EXPECTING_VALUE: &str = "1";
const EXPECTING_NOTHING: &str = "0";

lazy_static! {
    // KEYS[1]: key, ARGV[1]: whether a value is expected, ARGV[2]: expected value,
    // ARGV[3]: new value. A missing key reads as `false`.
    static ref COMPARE_AND_SET: Script = Script::new(
        r"
        local current = redis.call('GET', KEYS[1])
        if ARGV[1] == '1' then
            if current ~= ARGV[2] then
                return 0
            end
        elseif current then
            return 0
        end
        redis.call('SET', KEYS[1], ARGV[3])
        return 1
        "
    );
}

/// Script arguments describing the value the key must hold for the write to happen.
fn expectation_args(expected: Option<&Fingerprint>) -> (&'static str, String) {
    match expected {
        Some(fingerprint) => (EXPECTING_VALUE, fingerprint.inner()),
        None => (EXPECTING_NOTHING, String::new()),
    }
}

#[async_trait]
impl StateGateway for Client {
    #[tracing::instrument(err, skip(self), level = "debug")]
    async fn get(&self, key: &StateKey) -> anyhow::Result<Option<Fingerprint>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::Cmd::get(key.as_ref())
            .query_async(&mut conn)
            .await
            .with_context(|| format!("Failed to get fingerprint for key {key}"))?;
        Ok(value.map(Fingerprint::from))
    }

    #[tracing::instrument(err, skip(self), level = "debug")]
    async fn put(&self, key: &StateKey, fingerprint: &Fingerprint) -> anyhow::Result<()> {
        let mut conn = self.conn.clone();
        redis::Cmd::set(key.as_ref(), fingerprint.as_ref())
            .query_async::<_, ()>(&mut conn)
            .await
            .with_context(|| format!("Failed to set fingerprint for key {key}"))
    }

    #[tracing::instrument(err, skip(self), level = "debug")]
    async fn compare_and_put(
        &self,
        key: &StateKey,
        expected: Option<Fingerprint>,
        fingerprint: &Fingerprint,
    ) -> anyhow::Result<bool> {
        let mut conn = self.conn.clone();
        let (expecting, expected_value) = expectation_args(expected.as_ref());
        let stored: i64 = COMPARE_AND_SET
            .key(key.as_ref())
            .arg(expecting)
            .arg(expected_value)
            .arg(fingerprint.as_ref())
            .invoke_async(&mut conn)
            .await
            .with_context(|| format!("Failed to compare and set fingerprint for key {key}"))?;
        Ok(stored == 1)
    }
}
