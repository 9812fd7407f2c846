//! csv input/output format and functions

use csv_async::{AsyncWriterBuilder, Terminator};
use rust_decimal::Decimal;

use crate::{
    account::{Account, AccountType},
    engine::Engine,
    errors::EngineErr,
    store::AccountStore,
    AccountId,
};
use serde::{Deserialize, Serialize};

use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::mpsc::Sender,
};
use tokio_stream::{Stream, StreamExt};

// Allowed operation types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum RawOperationType {
    Open,
    Deposit,
    Withdraw,
    Lock,
    Unlock,
}

/// One row of operations csv
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct RawOperation {
    pub r#type: RawOperationType,
    pub account: AccountId,
    pub amount: Option<Decimal>,
    pub kind: Option<AccountType>,
}

impl RawOperation {
    /// Apply this operation through `engine`. Missing amount counts as zero, so deposit and
    /// withdraw without one are rejected as invalid amount and open starts empty.
    pub async fn apply<S: AccountStore>(self, engine: &Engine<S>) -> Result<(), EngineErr> {
        let amount = self.amount.unwrap_or_default();
        match self.r#type {
            RawOperationType::Open => {
                let kind = self.kind.unwrap_or_default();
                engine.open_account(self.account, kind, amount).await
            }
            RawOperationType::Deposit => engine.deposit(self.account, amount).await,
            RawOperationType::Withdraw => engine.withdraw(self.account, amount).await,
            RawOperationType::Lock => engine.lock(self.account).await,
            RawOperationType::Unlock => engine.unlock(self.account).await,
        }
    }
}

/// take a reader and continuously deserialize operations from it into `sender`
pub async fn deserialize_operations_from_csv_reader<'r, R: AsyncRead + Unpin + Send + 'r>(
    input: R,
    sender: Sender<RawOperation>,
) -> anyhow::Result<()> {
    let mut builder = csv_async::AsyncReaderBuilder::new();
    builder.trim(csv_async::Trim::All);

    let mut rdr = builder.create_deserializer(input);

    let _headers = rdr.headers().await?;

    let mut records = rdr.deserialize::<RawOperation>();
    while let Some(record) = records.next().await {
        let record: RawOperation = record?;
        sender.send(record).await?;
    }

    Ok(())
}

/// summary of account balance and state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct AccountSummary {
    pub account: AccountId,
    #[serde(rename = "type")]
    kind: AccountType,
    balance: Decimal,
    locked: bool,
}

impl From<&Account> for AccountSummary {
    fn from(oth: &Account) -> Self {
        let rp = 4; // round precision
        Self {
            account: oth.id(),
            kind: oth.kind(),
            balance: oth.balance().round_dp(rp),
            locked: oth.is_locked(),
        }
    }
}

/// read items from `in_stream` and save them as [`AccountSummary`] into `wr`. Headers will be
/// included automatically. Terminator is `\r\n`
pub async fn summarize_accounts(
    in_stream: impl Stream<Item = Account> + Unpin,
    wr: impl AsyncWrite + Unpin,
) -> anyhow::Result<()> {
    let mut in_stream = in_stream;

    let mut builder = AsyncWriterBuilder::new();
    builder.terminator(Terminator::CRLF);

    let mut wr = builder.create_serializer(wr);

    while let Some(acc) = in_stream.next().await {
        let acc_summary = AccountSummary::from(&acc);
        wr.serialize(acc_summary).await?;
    }

    wr.flush().await?;
    Ok(())
}
