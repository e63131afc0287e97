//! Signed transactions: RLP encoding and ECDSA sender recovery.
//!
//! The cryptographic signer and RLP codec are treated as fixed-interface
//! external collaborators; this module is a thin, direct use of
//! `secp256k1` and `alloy-rlp` rather than a from-scratch implementation.

use crate::{
    error::TransactionError,
    primitives::{keccak256, rlp_hash, Address, Bytes, TxKind, B256, U256},
    receipt::Receipt,
    Log,
};
use alloy_rlp::{RlpDecodable, RlpEncodable};
use secp256k1::{
    ecdsa::{RecoverableSignature, RecoveryId},
    Message, SECP256K1,
};
use serde::{Deserialize, Serialize};

/// The signed payload fields, in RLP order: what gets hashed for the
/// transaction hash and what gets RLP encoded for persistence (with
/// block-context extras appended separately, see [`PersistedTransaction`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, RlpEncodable, RlpDecodable)]
pub struct TxSigned {
    pub nonce: u64,
    pub gas_price: U256,
    pub gas_limit: u64,
    pub to: TxKind,
    pub value: U256,
    pub data: Bytes,
    pub v: u64,
    pub r: U256,
    pub s: U256,
}

impl TxSigned {
    /// Hash of the fields covered by the signature (legacy / EIP-155 style):
    /// `nonce, gasPrice, gasLimit, to, value, data[, chainId, 0, 0]`.
    fn signing_hash(&self, chain_id: Option<u64>) -> B256 {
        #[derive(RlpEncodable)]
        struct Unsigned<'a> {
            nonce: u64,
            gas_price: U256,
            gas_limit: u64,
            to: TxKind,
            value: U256,
            data: &'a Bytes,
        }

        #[derive(RlpEncodable)]
        struct UnsignedEip155<'a> {
            nonce: u64,
            gas_price: U256,
            gas_limit: u64,
            to: TxKind,
            value: U256,
            data: &'a Bytes,
            chain_id: u64,
            zero_r: u8,
            zero_s: u8,
        }

        match chain_id {
            Some(chain_id) => rlp_hash(&UnsignedEip155 {
                nonce: self.nonce,
                gas_price: self.gas_price,
                gas_limit: self.gas_limit,
                to: self.to,
                value: self.value,
                data: &self.data,
                chain_id,
                zero_r: 0,
                zero_s: 0,
            }),
            None => rlp_hash(&Unsigned {
                nonce: self.nonce,
                gas_price: self.gas_price,
                gas_limit: self.gas_limit,
                to: self.to,
                value: self.value,
                data: &self.data,
            }),
        }
    }

    /// Chain id embedded in `v` per EIP-155, if present (`v >= 35`).
    fn chain_id(&self) -> Option<u64> {
        if self.v >= 35 {
            Some((self.v - 35) / 2)
        } else {
            None
        }
    }

    fn recovery_id(&self) -> RecoveryId {
        let parity = match self.chain_id() {
            Some(chain_id) => self.v - 35 - 2 * chain_id,
            None => self.v - 27,
        };
        RecoveryId::from_i32(parity as i32).unwrap_or(RecoveryId::from_i32(0).expect("valid"))
    }

    /// Recovers the sender address from `(v, r, s)`.
    pub fn recover_signer(&self) -> Result<Address, TransactionError> {
        let hash = self.signing_hash(self.chain_id());
        let mut sig_bytes = [0u8; 64];
        sig_bytes[..32].copy_from_slice(&self.r.to_be_bytes::<32>());
        sig_bytes[32..].copy_from_slice(&self.s.to_be_bytes::<32>());

        let signature = RecoverableSignature::from_compact(&sig_bytes, self.recovery_id())
            .map_err(|_| TransactionError::InvalidSignature)?;
        let message = Message::from_digest(hash.0);
        let public_key = SECP256K1
            .recover_ecdsa(&message, &signature)
            .map_err(|_| TransactionError::InvalidSignature)?;

        let uncompressed = public_key.serialize_uncompressed();
        let hash = keccak256(&uncompressed[1..]);
        Ok(Address::from_slice(&hash[12..]))
    }

    pub fn hash(&self) -> B256 {
        rlp_hash(self)
    }
}

/// A transaction plus everything learned about it after execution:
/// the recovered sender, the produced receipt and logs, and its position in
/// the block that included it.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub raw: TxSigned,
    pub hash: B256,
    pub from: Address,
    pub receipt: Option<Receipt>,
    pub logs: Vec<Log>,
    pub block_hash: Option<B256>,
    pub block_number: Option<u64>,
    pub transaction_index: Option<u64>,
}

impl Transaction {
    /// Builds a `Transaction` from its signed wire form, recovering the
    /// sender eagerly (mirrors how pool admission needs the sender up
    /// front to bucket the transaction by nonce).
    pub fn from_signed(raw: TxSigned) -> Result<Self, TransactionError> {
        let from = raw.recover_signer()?;
        let hash = raw.hash();
        Ok(Self {
            raw,
            hash,
            from,
            receipt: None,
            logs: Vec::new(),
            block_hash: None,
            block_number: None,
            transaction_index: None,
        })
    }

    pub fn hash(&self) -> B256 {
        self.hash
    }

    pub fn nonce(&self) -> u64 {
        self.raw.nonce
    }

    pub fn gas_price(&self) -> U256 {
        self.raw.gas_price
    }

    pub fn gas_limit(&self) -> u64 {
        self.raw.gas_limit
    }

    pub fn to(&self) -> TxKind {
        self.raw.to
    }

    pub fn value(&self) -> U256 {
        self.raw.value
    }

    /// Marks this transaction as included at `(block_hash, block_number,
    /// transaction_index)`.
    pub fn set_block_context(&mut self, block_hash: B256, block_number: u64, index: u64) {
        self.block_hash = Some(block_hash);
        self.block_number = Some(block_number);
        self.transaction_index = Some(index);
    }
}

/// The persisted form of a transaction: `rlp(raw_tx_fields ++ [blockHash,
/// blockNumber, txIndex])`, keyed by transaction hash in the `transactions`
/// keyspace.
#[derive(Debug, Clone, RlpEncodable, RlpDecodable)]
pub struct PersistedTransaction {
    pub raw: TxSigned,
    pub block_hash: B256,
    pub block_number: u64,
    pub transaction_index: u64,
}

impl PersistedTransaction {
    pub fn from_transaction(tx: &Transaction) -> Option<Self> {
        Some(Self {
            raw: tx.raw.clone(),
            block_hash: tx.block_hash?,
            block_number: tx.block_number?,
            transaction_index: tx.transaction_index?,
        })
    }
}
