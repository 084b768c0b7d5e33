use std::{fmt::Debug, io};

use solana_client::client_error::ClientError;
use solana_sdk::{
    instruction::InstructionError,
    signature::Signature,
    signer::SignerError,
    transaction::TransactionError,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("TransactionError: {0}")]
    TransactionError(#[from] Box<TransactionError>),

    #[error("ClientError: {0}")]
    ClientError(#[from] Box<ClientError>),

    #[error("SignerError: {0}")]
    Signer(#[from] SignerError),

    #[error("IoError: {0}")]
    IoError(#[from] Box<io::Error>),

    /// The transaction was neither confirmed nor rejected before its
    /// blockhash expired.
    #[error("Blockhash expired before transaction {0} was confirmed")]
    BlockhashExpired(Signature),

    #[error("Error: `{0}`")]
    CustomError(String),

    #[error("Assert Rpc Error: {0}")]
    AssertRpcError(String),
}

impl From<TransactionError> for RpcError {
    fn from(err: TransactionError) -> Self {
        RpcError::TransactionError(Box::new(err))
    }
}

impl From<ClientError> for RpcError {
    fn from(err: ClientError) -> Self {
        RpcError::ClientError(Box::new(err))
    }
}

impl From<io::Error> for RpcError {
    fn from(err: io::Error) -> Self {
        RpcError::IoError(Box::new(err))
    }
}

/// Asserts that `result` failed in instruction `i` with custom program error
/// `expected_error_code`.
pub fn assert_rpc_error<T: Debug>(
    result: Result<T, RpcError>,
    i: u8,
    expected_error_code: u32,
) -> Result<(), RpcError> {
    match result {
        Err(RpcError::TransactionError(ref box_err)) => match **box_err {
            TransactionError::InstructionError(index, InstructionError::Custom(error_code))
                if index == i && error_code == expected_error_code =>
            {
                Ok(())
            }
            TransactionError::InstructionError(index, InstructionError::Custom(error_code)) => {
                Err(RpcError::AssertRpcError(format!(
                    "Expected error code {} in instruction {}, got {} in instruction {}",
                    expected_error_code, i, error_code, index
                )))
            }
            _ => Err(RpcError::AssertRpcError(format!(
                "Unexpected transaction error: {:?}",
                box_err
            ))),
        },
        Err(e) => Err(RpcError::AssertRpcError(format!(
            "Unexpected error type: {:?}",
            e
        ))),
        Ok(value) => Err(RpcError::AssertRpcError(format!(
            "Expected an error, got {:?}",
            value
        ))),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_assert_rpc_error() {
        let err = || -> Result<(), RpcError> {
            Err(TransactionError::InstructionError(1, InstructionError::Custom(6001)).into())
        };
        assert!(assert_rpc_error(err(), 1, 6001).is_ok());
        assert!(matches!(
            assert_rpc_error(err(), 0, 6001),
            Err(RpcError::AssertRpcError(_))
        ));
        assert!(matches!(
            assert_rpc_error(err(), 1, 6000),
            Err(RpcError::AssertRpcError(_))
        ));
        assert!(matches!(
            assert_rpc_error(Ok::<u8, RpcError>(1), 0, 0),
            Err(RpcError::AssertRpcError(_))
        ));
        assert!(matches!(
            assert_rpc_error::<()>(Err(RpcError::CustomError("x".into())), 0, 0),
            Err(RpcError::AssertRpcError(_))
        ));
    }
}
