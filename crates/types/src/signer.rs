//! Local signing for the accounts forgechain manages on the user's behalf,
//! used by `eth_sendTransaction`-style flows where the node holds the
//! private key rather than the caller.

use crate::{
    error::TransactionError,
    primitives::{keccak256, rlp_hash, Address, B256},
    transaction::TxSigned,
};
use secp256k1::{Keypair, Message, SecretKey, SECP256K1};

/// A keypair forgechain can sign transactions with, addressed by the
/// corresponding account address.
#[derive(Clone)]
pub struct LocalSigner {
    address: Address,
    secret_key: SecretKey,
}

impl LocalSigner {
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let keypair = Keypair::from_secret_key(SECP256K1, &secret_key);
        let public = keypair.public_key().serialize_uncompressed();
        let hash = keccak256(&public[1..]);
        let address = Address::from_slice(&hash[12..]);
        Self { address, secret_key }
    }

    /// Generates a fresh random signer, used to mint `initialAccounts` that
    /// weren't given an explicit address.
    pub fn random() -> Self {
        let secret_key = SecretKey::new(&mut rand::thread_rng());
        Self::from_secret_key(secret_key)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// `0x`-prefixed hex private key, for the CLI's `accounts` command to
    /// print so a user can import a dev account into a wallet.
    pub fn private_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.secret_key.secret_bytes()))
    }

    /// Signs the legacy/EIP-155 signing hash of `tx` and fills in `v, r, s`.
    pub fn sign(&self, mut tx: TxSigned, chain_id: u64) -> Result<TxSigned, TransactionError> {
        let hash = unsigned_hash(&tx, chain_id);
        let message = Message::from_digest(hash.0);
        let signature = SECP256K1.sign_ecdsa_recoverable(&message, &self.secret_key);
        let (recovery_id, bytes) = signature.serialize_compact();

        tx.r = alloy_primitives::U256::from_be_slice(&bytes[..32]);
        tx.s = alloy_primitives::U256::from_be_slice(&bytes[32..]);
        tx.v = chain_id * 2 + 35 + recovery_id.to_i32() as u64;
        Ok(tx)
    }
}

fn unsigned_hash(tx: &TxSigned, chain_id: u64) -> B256 {
    #[derive(alloy_rlp::RlpEncodable)]
    struct Unsigned<'a> {
        nonce: u64,
        gas_price: alloy_primitives::U256,
        gas_limit: u64,
        to: alloy_primitives::TxKind,
        value: alloy_primitives::U256,
        data: &'a alloy_primitives::Bytes,
        chain_id: u64,
        zero_r: u8,
        zero_s: u8,
    }

    rlp_hash(&Unsigned {
        nonce: tx.nonce,
        gas_price: tx.gas_price,
        gas_limit: tx.gas_limit,
        to: tx.to,
        value: tx.value,
        data: &tx.data,
        chain_id,
        zero_r: 0,
        zero_s: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Bytes, TxKind, U256};

    #[test]
    fn sign_then_recover_roundtrips_to_signer_address() {
        let signer = LocalSigner::random();
        let tx = TxSigned {
            nonce: 0,
            gas_price: U256::from(1_000_000_000u64),
            gas_limit: 21_000,
            to: TxKind::Call(Address::ZERO),
            value: U256::from(1u64),
            data: Bytes::new(),
            v: 0,
            r: U256::ZERO,
            s: U256::ZERO,
        };
        let signed = signer.sign(tx, 1337).expect("signing succeeds");
        let recovered = signed.recover_signer().expect("recovery succeeds");
        assert_eq!(recovered, signer.address());
    }
}
