//! Incremental script construction and standard script templates.
//!
//! `ScriptBuilder` writes opcodes and data pushes into a growable buffer and
//! finishes into an immutable [`Script`]. The `Script::create_*` templates
//! are thin sequences of builder writes.

use txscript_primitives::hash::hash160_from_slice;

use crate::chunk::{push_data_prefix, ScriptChunk};
use crate::opcodes::*;
use crate::{Script, ScriptError};

/// Accumulates script bytes one chunk at a time.
#[derive(Clone, Debug, Default)]
pub struct ScriptBuilder {
    buf: Vec<u8>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ScriptBuilder {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Append a single opcode byte.
    ///
    /// Any value is accepted, including the push-range bytes; writing one of
    /// those produces whatever a literal byte would.
    pub fn write_opcode(&mut self, op: u8) -> &mut Self {
        self.buf.push(op);
        self
    }

    /// Append `data` behind the shortest push prefix for its length.
    pub fn write_data(&mut self, data: &[u8]) -> Result<&mut Self, ScriptError> {
        let prefix = push_data_prefix(data.len())?;
        self.buf.extend_from_slice(&prefix);
        self.buf.extend_from_slice(data);
        Ok(self)
    }

    /// Append an opcode or a data push.
    ///
    /// ```
    /// use txscript::opcodes::{OP_CHECKSIG, OP_DUP};
    /// use txscript::ScriptBuilder;
    ///
    /// let mut builder = ScriptBuilder::new();
    /// builder.write_chunk(OP_DUP)?.write_chunk(&[0xab; 3])?.write_chunk(OP_CHECKSIG)?;
    /// assert_eq!(builder.build().to_hex(), "7603abababac");
    /// # Ok::<(), txscript::ScriptError>(())
    /// ```
    pub fn write_chunk(&mut self, chunk: impl Into<ScriptChunk>) -> Result<&mut Self, ScriptError> {
        match chunk.into() {
            ScriptChunk::Opcode(op) => Ok(self.write_opcode(op)),
            ScriptChunk::Data(data) => self.write_data(&data),
        }
    }

    /// Append every chunk of `script`, re-encoded canonically.
    pub fn write_script(&mut self, script: &Script) -> Result<&mut Self, ScriptError> {
        for chunk in script.chunks() {
            chunk.encode_into(&mut self.buf)?;
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Finish into an immutable script.
    pub fn build(&self) -> Script {
        Script::from_bytes(&self.buf)
    }

    pub fn into_script(self) -> Script {
        Script::from_vec(self.buf)
    }
}

impl Script {
    /// Build a script with a closure over a fresh builder.
    ///
    /// # Arguments
    /// * `f` - Writes the script's chunks.
    ///
    /// # Returns
    /// The finished script, or the first error `f` returned.
    pub fn create<F>(f: F) -> Result<Script, ScriptError>
    where
        F: FnOnce(&mut ScriptBuilder) -> Result<(), ScriptError>,
    {
        let mut builder = ScriptBuilder::new();
        f(&mut builder)?;
        Ok(builder.into_script())
    }

    /// Create an `m`-of-`n` multisig locking script.
    ///
    /// Produces: `OP_m <pubkey>... OP_n OP_CHECKMULTISIG`, keys in the order
    /// given. The caller must ensure `1 <= m <= pubkeys.len() <= 16`; values
    /// outside that range are encoded literally, not rejected.
    ///
    /// # Arguments
    /// * `m` - Number of signatures required.
    /// * `pubkeys` - Serialized public keys.
    pub fn create_multisig_output<K: AsRef<[u8]>>(
        m: usize,
        pubkeys: &[K],
    ) -> Result<Script, ScriptError> {
        let n = pubkeys.len();
        if !(1..=n).contains(&m) || n > 16 {
            tracing::debug!(m, n, "multisig parameters outside 1 <= m <= n <= 16");
        }

        let mut builder = ScriptBuilder::new();
        builder.write_opcode(small_int_opcode(m));
        for key in pubkeys {
            builder.write_data(key.as_ref())?;
        }
        builder
            .write_opcode(small_int_opcode(n))
            .write_opcode(OP_CHECKMULTISIG);
        Ok(builder.into_script())
    }

    /// Create the unlocking script for a multisig output.
    ///
    /// Produces: `OP_0 <sig>...`. The leading OP_0 is consumed and ignored
    /// by OP_CHECKMULTISIG, which pops one more item than it uses.
    pub fn create_multisig_input<S: AsRef<[u8]>>(signatures: &[S]) -> Result<Script, ScriptError> {
        let mut builder = ScriptBuilder::new();
        builder.write_opcode(OP_0);
        for signature in signatures {
            builder.write_data(signature.as_ref())?;
        }
        Ok(builder.into_script())
    }

    /// Create a pay-to-script-hash unlocking script.
    ///
    /// Produces the chunks of `redeem_input` followed by one push of the
    /// serialized `redeem_output`.
    ///
    /// # Arguments
    /// * `redeem_input` - The unlocking script for the redeem script.
    /// * `redeem_output` - The redeem script itself.
    pub fn create_script_hash_input(
        redeem_input: &Script,
        redeem_output: &Script,
    ) -> Result<Script, ScriptError> {
        let mut builder = ScriptBuilder::with_capacity(redeem_input.len() + redeem_output.len() + 5);
        builder
            .write_script(redeem_input)?
            .write_data(redeem_output.as_bytes())?;
        Ok(builder.into_script())
    }

    /// Create a null-data output: `OP_RETURN <data>`.
    pub fn create_null_data_output(data: &[u8]) -> Result<Script, ScriptError> {
        let mut builder = ScriptBuilder::new();
        builder.write_opcode(OP_RETURN).write_data(data)?;
        Ok(builder.into_script())
    }

    /// Create a pay-to-public-key-hash locking script.
    ///
    /// Produces: `OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG`.
    ///
    /// # Returns
    /// The 25-byte script, or an error if `hash` is not 20 bytes.
    pub fn create_pubkey_hash_output(hash: &[u8]) -> Result<Script, ScriptError> {
        let hash = hash160_from_slice(hash)?;
        let mut builder = ScriptBuilder::with_capacity(25);
        builder
            .write_opcode(OP_DUP)
            .write_opcode(OP_HASH160)
            .write_data(&hash)?
            .write_opcode(OP_EQUALVERIFY)
            .write_opcode(OP_CHECKSIG);
        Ok(builder.into_script())
    }

    /// Create a pay-to-script-hash locking script.
    ///
    /// Produces: `OP_HASH160 <hash> OP_EQUAL`.
    ///
    /// # Returns
    /// The 23-byte script, or an error if `hash` is not 20 bytes.
    pub fn create_script_hash_output(hash: &[u8]) -> Result<Script, ScriptError> {
        let hash = hash160_from_slice(hash)?;
        let mut builder = ScriptBuilder::with_capacity(23);
        builder
            .write_opcode(OP_HASH160)
            .write_data(&hash)?
            .write_opcode(OP_EQUAL);
        Ok(builder.into_script())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{decode_script, encode_chunks};
    use crate::ScriptType;

    fn filled(byte: u8, len: usize) -> Vec<u8> {
        vec![byte; len]
    }

    fn keys() -> Vec<Vec<u8>> {
        [
            "02b2b9815744d0c95bb3fa82db4563757f5223379cb16f6b4ecbab5677527f0552",
            "03a7e75f1c9093622d16ecb9dee45b2f8ef10c84f7bfcd2d0ce29017ed97b9a52c",
            "0331a136cb2190f9b576d16596cf10bdda3e75504e7021caa0921fc809e7756100",
        ]
        .iter()
        .map(|k| hex::decode(k).unwrap())
        .collect()
    }

    fn signatures() -> Vec<Vec<u8>> {
        [
            "30440220515a7e94aec5afddc05067e47f91b799301b2f613ac2ec2c76e224a4af7b614f022000c17bcb87eab038c023a968877702acc2fcebb7fc68eda680ac166b1b1e4e2201",
            "30450220352dbd98e01cbdac931d868a62ca5abe5494ffc7a6da3e863f7e239a4a204aa0022100eb8198d942d745bdccbc6c3e61f5aa3f7e6855295de96484c308972cf025d92d01",
        ]
        .iter()
        .map(|s| hex::decode(s).unwrap())
        .collect()
    }

    // -----------------------------------------------------------------------
    // write_chunk
    // -----------------------------------------------------------------------

    #[test]
    fn test_write_every_opcode() {
        let script = Script::create(|b| {
            for &(_, value) in OPCODES {
                b.write_chunk(value)?;
            }
            Ok(())
        })
        .unwrap();
        let expected: Vec<u8> = OPCODES.iter().map(|&(_, value)| value).collect();
        assert_eq!(script.as_bytes(), expected.as_slice());
    }

    #[test]
    fn test_write_direct_push_limit() {
        let data = filled(b'0', 0x4b);
        let script = Script::create(|b| b.write_chunk(data.as_slice()).map(|_| ())).unwrap();
        assert_eq!(script.to_hex(), format!("4b{}", hex::encode(&data)));
    }

    #[test]
    fn test_write_pushdata1() {
        let low = filled(b'0', 0x4c);
        let high = filled(b'1', 0xff);
        let script = Script::create(|b| {
            b.write_chunk(low.as_slice())?.write_chunk(high.as_slice())?;
            Ok(())
        })
        .unwrap();
        assert_eq!(
            script.to_hex(),
            format!("4c4c{}4cff{}", hex::encode(&low), hex::encode(&high))
        );
    }

    #[test]
    fn test_write_pushdata2() {
        let low = filled(b'0', 0x100);
        let high = filled(b'1', 0xffff);
        let script = Script::create(|b| {
            b.write_chunk(low.as_slice())?.write_chunk(high.as_slice())?;
            Ok(())
        })
        .unwrap();
        assert_eq!(
            script.to_hex(),
            format!("4d0001{}4dffff{}", hex::encode(&low), hex::encode(&high))
        );
    }

    #[test]
    fn test_write_pushdata4() {
        let data = filled(b'0', 0x10000);
        let script = Script::create(|b| b.write_chunk(data.clone()).map(|_| ())).unwrap();
        assert_eq!(script.to_hex(), format!("4e00000100{}", hex::encode(&data)));
        assert_eq!(script.chunks(), &[ScriptChunk::Data(data)]);
    }

    #[test]
    fn test_write_empty_data_is_op_0() {
        let mut builder = ScriptBuilder::new();
        builder.write_data(&[]).unwrap();
        assert_eq!(builder.build().chunks(), &[ScriptChunk::Opcode(OP_0)]);
    }

    #[test]
    fn test_create_propagates_closure_error() {
        let result = Script::create(|_| Err(ScriptError::PartTooBig(0)));
        assert!(matches!(result, Err(ScriptError::PartTooBig(0))));
    }

    // -----------------------------------------------------------------------
    // Templates
    // -----------------------------------------------------------------------

    #[test]
    fn test_multisig_2_of_3_script_hash() {
        let redeem_output = Script::create_multisig_output(2, &keys()).unwrap();
        let redeem_input = Script::create_multisig_input(&signatures()).unwrap();
        let input_script = Script::create_script_hash_input(&redeem_input, &redeem_output).unwrap();

        assert_eq!(
            redeem_output.to_hex(),
            "522102b2b9815744d0c95bb3fa82db4563757f5223379cb16f6b4ecbab5677527f05522103a7e75f1c9093622d16ecb9dee45b2f8ef10c84f7bfcd2d0ce29017ed97b9a52c210331a136cb2190f9b576d16596cf10bdda3e75504e7021caa0921fc809e775610053ae"
        );
        assert_eq!(
            redeem_input.to_hex(),
            "004730440220515a7e94aec5afddc05067e47f91b799301b2f613ac2ec2c76e224a4af7b614f022000c17bcb87eab038c023a968877702acc2fcebb7fc68eda680ac166b1b1e4e22014830450220352dbd98e01cbdac931d868a62ca5abe5494ffc7a6da3e863f7e239a4a204aa0022100eb8198d942d745bdccbc6c3e61f5aa3f7e6855295de96484c308972cf025d92d01"
        );
        assert_eq!(
            input_script.to_hex(),
            "004730440220515a7e94aec5afddc05067e47f91b799301b2f613ac2ec2c76e224a4af7b614f022000c17bcb87eab038c023a968877702acc2fcebb7fc68eda680ac166b1b1e4e22014830450220352dbd98e01cbdac931d868a62ca5abe5494ffc7a6da3e863f7e239a4a204aa0022100eb8198d942d745bdccbc6c3e61f5aa3f7e6855295de96484c308972cf025d92d014c69522102b2b9815744d0c95bb3fa82db4563757f5223379cb16f6b4ecbab5677527f05522103a7e75f1c9093622d16ecb9dee45b2f8ef10c84f7bfcd2d0ce29017ed97b9a52c210331a136cb2190f9b576d16596cf10bdda3e75504e7021caa0921fc809e775610053ae"
        );
        assert_eq!(redeem_output.script_type(), ScriptType::MultiSig);
    }

    #[test]
    fn test_script_hash_input_composition() {
        let redeem_output = Script::create_multisig_output(2, &keys()).unwrap();
        let redeem_input = Script::create_multisig_input(&signatures()).unwrap();
        let input_script = Script::create_script_hash_input(&redeem_input, &redeem_output).unwrap();

        let mut expected = encode_chunks(redeem_input.chunks()).unwrap();
        expected.extend_from_slice(&push_data_prefix(redeem_output.len()).unwrap());
        expected.extend_from_slice(redeem_output.as_bytes());
        assert_eq!(input_script.as_bytes(), expected.as_slice());
        assert_eq!(
            input_script.chunks().last(),
            Some(&ScriptChunk::Data(redeem_output.as_bytes().to_vec()))
        );
    }

    #[test]
    fn test_multisig_output_deterministic() {
        let first = Script::create_multisig_output(2, &keys()).unwrap();
        let second = Script::create_multisig_output(2, &keys()).unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_multisig_output_out_of_range_is_literal() {
        let script = Script::create_multisig_output(0, &keys()[..1]).unwrap();
        assert_eq!(script.as_bytes()[0], OP_RESERVED);
        assert_eq!(script.script_type(), ScriptType::NonStandard);
    }

    #[test]
    fn test_multisig_input_empty() {
        let script = Script::create_multisig_input::<Vec<u8>>(&[]).unwrap();
        assert_eq!(script.as_bytes(), &[OP_0]);
    }

    #[test]
    fn test_null_data_output() {
        let script = Script::create_null_data_output(b"hello").unwrap();
        assert_eq!(script.to_hex(), "6a0568656c6c6f");
        assert_eq!(script.script_type(), ScriptType::NullData);
        assert_eq!(script.capture(), None);
    }

    #[test]
    fn test_pubkey_hash_output() {
        let hash = hex::decode("badeecfdef0507247fc8f74241d73bc039972d7b").unwrap();
        let script = Script::create_pubkey_hash_output(&hash).unwrap();
        assert_eq!(script.to_hex(), "76a914badeecfdef0507247fc8f74241d73bc039972d7b88ac");
        assert_eq!(script.script_type(), ScriptType::PubKeyHash);
    }

    #[test]
    fn test_script_hash_output_of_redeem_script() {
        let redeem_output = Script::create_multisig_output(2, &keys()).unwrap();
        let hash = txscript_primitives::hash::hash160(redeem_output.as_bytes());
        let script = Script::create_script_hash_output(&hash).unwrap();
        assert_eq!(script.to_hex(), "a914dd08eb26665286ba8ccb40fd9994441a79c1cbc587");
        assert_eq!(script.capture().and_then(|c| c.as_hash().copied()), Some(hash));
    }

    #[test]
    fn test_hash_outputs_reject_wrong_length() {
        assert!(matches!(
            Script::create_pubkey_hash_output(&[0u8; 19]),
            Err(ScriptError::Primitives(_))
        ));
        assert!(Script::create_script_hash_output(&[0u8; 32]).is_err());
    }

    #[test]
    fn test_builder_output_round_trips() {
        let script = Script::create_multisig_output(1, &keys()).unwrap();
        let reencoded = encode_chunks(script.chunks()).unwrap();
        assert_eq!(decode_script(&reencoded), script.chunks());
        assert_eq!(reencoded, script.as_bytes());
    }
}
