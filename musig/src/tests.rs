use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;

const N_SIGS: usize = 200;
const N_TAPROOT: usize = 50;

fn hex32(s: &str) -> [u8; 32] {
    hex::decode(s)
        .expect("hex")
        .try_into()
        .expect("32 bytes")
}

fn sig_from_parts(rx: &str, s: &str) -> MusigSignature {
    MusigSignature {
        rx: hex32(rx),
        s: hex32(s),
    }
}

fn failing_nonce(_sk: &[u8; 32], _msg: &[u8; 32], _aux: Option<&[u8]>) -> Option<[u8; 32]> {
    None
}

fn zero_nonce(_sk: &[u8; 32], _msg: &[u8; 32], _aux: Option<&[u8]>) -> Option<[u8; 32]> {
    Some([0u8; 32])
}

fn failing_tweak_hash(_pk: &PublicKey, _commitment: &[u8; 32]) -> Option<[u8; 32]> {
    None
}

fn overflowing_tweak_hash(_pk: &PublicKey, _commitment: &[u8; 32]) -> Option<[u8; 32]> {
    Some([0xff; 32])
}

fn counting_context(capability: Capability) -> (Context, Arc<CountingSink>) {
    let sink = Arc::new(CountingSink::new());
    let ctx = Context::new(capability).with_diagnostics(sink.clone());
    (ctx, sink)
}

/// Signature vectors for `sk = 3` over the message `01 * 32`.
mod vectors {
    pub const RX_1: &str = "762a13c55948d5d0afc312014a13fb6898ac55fd9a85fae9878b262eddf65f99";
    pub const S_1: &str = "6ee50b14ebef1c159f09688e84a95bffe954a0db0e71a9071c3bf9be5e9746ba";
    pub const S_2: &str = "f84f867976120f722fa6ecc5925fe4b04264fe95846609c7c84539b9a785f575";
    pub const RX_4: &str = "762a13c55948d5d0afc312014a13fb6898ac55fd9a85fae9878b262eddf65f97";
    pub const FIELD_MODULUS: &str =
        "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f";
    pub const GROUP_ORDER: &str =
        "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";
    pub const RX_10: &str = "00000000000000000000003b78ce563f89a0ed9414f5aa28ad0d96d6795f9c63";
    pub const S_10: &str = "6356d3322e73862415e5e0d9537a788d4175b99d6f2ea30211feb9086489988e";
    pub const RX_11: &str = "8fe5236e798af107a9af890908b6e215d0c7e6cbd6e129af83f1f341362f4681";
    pub const S_11: &str = "000000d75041dbfec631486fea37a7df42f1d6013a8875fb9d44792aa7493412";
}

fn vector_key() -> SecretKey {
    let mut bytes = [0u8; 32];
    bytes[31] = 3;
    SecretKey::from_bytes(&bytes).expect("three")
}

struct Fixture {
    sigs: Vec<MusigSignature>,
    messages: Vec<[u8; 32]>,
    pubkeys: Vec<PublicKey>,
    internal_keys: Vec<PublicKey>,
    output_keys: Vec<PublicKey>,
    commitments: Vec<[u8; 32]>,
}

impl Fixture {
    fn new(ctx: &Context, rng: &mut StdRng, n_sigs: usize, n_taproot: usize) -> Self {
        let mut fixture = Fixture {
            sigs: Vec::with_capacity(n_sigs),
            messages: Vec::with_capacity(n_sigs),
            pubkeys: Vec::with_capacity(n_sigs),
            internal_keys: Vec::with_capacity(n_taproot),
            output_keys: Vec::with_capacity(n_taproot),
            commitments: Vec::with_capacity(n_taproot),
        };

        for i in 0..n_sigs {
            let sk = SecretKey::random(rng);
            let mut msg = [0u8; 32];
            msg[..8].copy_from_slice(&(i as u64).to_be_bytes());
            fixture.sigs.push(ctx.sign(&msg, &sk).expect("sign"));
            fixture.messages.push(msg);
            fixture.pubkeys.push(sk.public_key());
        }

        for i in 0..n_taproot {
            let internal = SecretKey::random(rng).public_key();
            let commitment = sha256(&(i as u64).to_le_bytes());
            fixture
                .output_keys
                .push(ctx.taproot_tweak(&internal, &commitment).expect("tweak"));
            fixture.internal_keys.push(internal);
            fixture.commitments.push(commitment);
        }

        fixture
    }

    fn signatures(&self) -> SignatureBatch<'_> {
        SignatureBatch::new(&self.sigs, &self.messages, &self.pubkeys)
    }

    fn taproot(&self) -> TaprootBatch<'_> {
        TaprootBatch::new(&self.internal_keys, &self.output_keys, &self.commitments)
    }
}

#[test]
fn test_sign_verify() {
    let ctx = Context::all();
    let mut rng = StdRng::seed_from_u64(42);
    let sk = SecretKey::random(&mut rng);
    let pk = sk.public_key();
    let msg = [0x5au8; 32];

    let sig = ctx.sign(&msg, &sk).expect("sign");
    assert!(ctx.verify_1(&sig, &msg, &pk).expect("verify"));
}

#[test]
fn test_verify_rejects_wrong_message() {
    let ctx = Context::all();
    let mut rng = StdRng::seed_from_u64(42);
    let sk = SecretKey::random(&mut rng);
    let msg = [10u8; 32];
    let sig = ctx.sign(&msg, &sk).expect("sign");

    let mut wrong_msg = msg;
    wrong_msg[31] ^= 1;
    assert!(!ctx.verify_1(&sig, &wrong_msg, &sk.public_key()).expect("verify"));
}

#[test]
fn test_verify_rejects_wrong_key() {
    let ctx = Context::all();
    let mut rng = StdRng::seed_from_u64(42);
    let sk = SecretKey::random(&mut rng);
    let msg = [21u8; 32];
    let sig = ctx.sign(&msg, &sk).expect("sign");

    let wrong_pk = SecretKey::random(&mut rng).public_key();
    assert!(!ctx.verify_1(&sig, &msg, &wrong_pk).expect("verify"));
}

#[test]
fn test_signing_is_deterministic() {
    let ctx = Context::signing_only();
    let mut rng = StdRng::seed_from_u64(3);
    let sk = SecretKey::random(&mut rng);
    let msg = [1u8; 32];

    let a = ctx.sign(&msg, &sk).expect("sign");
    let b = ctx.sign(&msg, &sk).expect("sign");
    assert_eq!(a, b);

    let with_aux = ctx
        .sign_with(&msg, &sk, &DeterministicNonce, Some(b"extra entropy"))
        .expect("sign");
    assert_ne!(a.rx, with_aux.rx);
    assert!(
        Context::verification_only()
            .verify_1(&with_aux, &msg, &sk.public_key())
            .expect("verify")
    );
}

#[test]
fn test_signature_vectors() {
    let ctx = Context::all();
    let cases = [
        (
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
            "0000000000000000000000000000000000000000000000000000000000000000",
            "787a848e71043d280c50470e8e1532b2dd5d20ee912a45dbdd2bd1dfbf187ef6\
             7031a98831859dc34dffeedda86831842ccd0079e1f92af177f7f22cc1dced05",
        ),
        (
            "b7e151628aed2a6abf7158809cf4f3c762e7160f38b4da56a784d9045190cfef",
            "02dff1d77f2a671c5f36183726db2341be58feae1da2deced843240f7b502ba659",
            "243f6a8885a308d313198a2e03707344a4093822299f31d0082efa98ec4e6c89",
            "2a298dacae57395a15d0795ddbfd1dcb564da82b0f269bc70a74f8220429ba1d\
             1e51a22ccec35599b8f266912281f8365ffc2d035a230434a1a64dc59f7013fd",
        ),
        (
            "c90fdaa22168c234c4c6628b80dc1cd129024e088a67cc74020bbea63b14e5c7",
            "03fac2114c2fbb091527eb7c64ecb11f8021cb45e8e7809d3c0938e4b8c0e5f84b",
            "5e2d58d8b3bcdf1abadec7829054f90dda9805aab56c77333024b9d0a508b75c",
            "00da9b08172a9b6f0466a2defd817f2d7ab437e0d253cb5395a963866b3574be\
             00880371d01766935b92d2ab4cd5c8a2a5837ec57fed7660773a05f0de142380",
        ),
    ];

    for (sk_hex, pk_hex, msg_hex, sig_hex) in cases {
        let sk = SecretKey::from_bytes(&hex32(sk_hex)).expect("secret key");
        let pk: PublicKey = pk_hex.parse().expect("public key");
        let msg = hex32(msg_hex);
        let expected: MusigSignature = sig_hex.parse().expect("signature");

        assert_eq!(sk.public_key(), pk);
        let sig = ctx.sign(&msg, &sk).expect("sign");
        assert_eq!(sig, expected);
        assert!(ctx.verify_1(&sig, &msg, &pk).expect("verify"));
    }
}

#[test]
fn test_verify_vectors() {
    use vectors::*;

    let ctx = Context::verification_only();
    let pk = vector_key().public_key();
    let msg = [1u8; 32];

    let sig1 = sig_from_parts(RX_1, S_1);
    assert_eq!(
        Context::signing_only().sign(&msg, &vector_key()).expect("sign"),
        sig1
    );
    assert!(ctx.verify_1(&sig1, &msg, &pk).expect("verify"));

    let mut sig3 = sig1.serialize();
    sig3[63] = 0xbb;

    let zero = "0000000000000000000000000000000000000000000000000000000000000000";
    let invalid = [
        sig_from_parts(RX_1, S_2),
        MusigSignature::parse(&sig3),
        sig_from_parts(RX_4, S_1),
        sig_from_parts(RX_1, zero),
        sig_from_parts(zero, S_2),
        sig_from_parts(zero, zero),
        sig_from_parts(FIELD_MODULUS, S_2),
        sig_from_parts(RX_1, GROUP_ORDER),
    ];
    for sig in &invalid {
        assert!(!ctx.verify_1(sig, &msg, &pk).expect("verify"), "{sig}");
    }

    let sig10 = sig_from_parts(RX_10, S_10);
    let sig11 = sig_from_parts(RX_11, S_11);
    assert!(ctx.verify_1(&sig10, &msg, &pk).expect("verify"));
    assert!(ctx.verify_1(&sig11, &msg, &pk).expect("verify"));

    let valid = [sig1, sig10, sig11];
    let messages = [msg; 3];
    let pubkeys = [pk; 3];
    let mut scratch = ScratchSpace::new(batch_scratch_size(3, 0));
    let batch = SignatureBatch::new(&valid, &messages, &pubkeys);
    assert!(
        ctx.verify_batch(&mut scratch, &batch, &TaprootBatch::empty())
            .expect("verify")
    );

    for bad in invalid {
        let sigs = [sig1, bad, sig11];
        let batch = SignatureBatch::new(&sigs, &messages, &pubkeys);
        assert!(
            !ctx.verify_batch(&mut scratch, &batch, &TaprootBatch::empty())
                .expect("verify")
        );
        assert_eq!(scratch.frame_count(), 0);
    }
}

#[test]
fn test_serialize_parse_roundtrip() {
    let bytes = [0x12u8; 64];
    let sig = MusigSignature::parse(&bytes);
    assert_eq!(sig.serialize(), bytes);

    let encoded = bincode::serialize(&sig).expect("serialize");
    let decoded: MusigSignature = bincode::deserialize(&encoded).expect("deserialize");
    assert_eq!(decoded, sig);
}

#[test]
fn test_nonce_failures() {
    let (ctx, sink) = counting_context(Capability::All);
    let mut rng = StdRng::seed_from_u64(11);
    let sk = SecretKey::random(&mut rng);
    let msg = [0u8; 32];

    assert_eq!(
        ctx.sign_with(&msg, &sk, &failing_nonce, None),
        Err(MusigError::NonceGenerationFailed)
    );
    assert_eq!(
        ctx.sign_with(&msg, &sk, &zero_nonce, None),
        Err(MusigError::ZeroNonce)
    );
    assert_eq!(sink.count(), 0);
}

#[test]
fn test_context_capabilities() {
    let mut rng = StdRng::seed_from_u64(5);
    let sk = SecretKey::random(&mut rng);
    let pk = sk.public_key();
    let msg = [9u8; 32];
    let sig = Context::all().sign(&msg, &sk).expect("sign");
    let tweak = [1u8; 32];
    let mut scratch = ScratchSpace::new(DEFAULT_SCRATCH_SIZE);
    let sigs = [sig];
    let messages = [msg];
    let pubkeys = [pk];
    let batch = SignatureBatch::new(&sigs, &messages, &pubkeys);

    let (none, sink) = counting_context(Capability::None);
    assert!(none.sign(&msg, &sk).is_err());
    assert!(none.verify_1(&sig, &msg, &pk).is_err());
    assert!(none.pubkey_combine(&pubkeys).is_err());
    assert!(none.pubkey_tweak_add(&pk, &tweak).is_err());
    assert!(none.taproot_tweak(&pk, &tweak).is_err());
    assert!(
        none.verify_batch(&mut scratch, &batch, &TaprootBatch::empty())
            .is_err()
    );
    assert_eq!(sink.count(), 6);
    assert!(none.tweak_secret_key(&sk, &pubkeys, 0).is_ok());
    assert_eq!(sink.count(), 6);

    let (signer, sink) = counting_context(Capability::SignOnly);
    assert!(signer.sign(&msg, &sk).is_ok());
    let err = signer.verify_1(&sig, &msg, &pk).expect_err("incapable");
    assert!(err.is_illegal_argument());
    assert_eq!(sink.count(), 1);
    assert!(matches!(
        signer.pubkey_combine(&pubkeys),
        Err(MusigError::IncapableContext { .. })
    ));
    assert_eq!(sink.count(), 2);
    assert!(
        signer
            .verify_batch(&mut scratch, &batch, &TaprootBatch::empty())
            .is_err()
    );
    assert_eq!(sink.count(), 3);
    assert!(signer.tweak_secret_key(&sk, &pubkeys, 0).is_ok());
    assert_eq!(sink.count(), 3);
    assert_eq!(scratch.frame_count(), 0);

    let (verifier, sink) = counting_context(Capability::VerifyOnly);
    assert_eq!(
        verifier.sign(&msg, &sk),
        Err(MusigError::IncapableContext {
            required: Capability::SignOnly,
            actual: Capability::VerifyOnly,
        })
    );
    assert!(verifier.verify_1(&sig, &msg, &pk).expect("verify"));
    assert!(
        verifier
            .verify_batch(&mut scratch, &batch, &TaprootBatch::empty())
            .expect("verify")
    );
    assert_eq!(sink.count(), 1);
}

#[test]
fn test_illegal_arguments() {
    let (ctx, sink) = counting_context(Capability::All);
    let mut rng = StdRng::seed_from_u64(6);
    let sk = SecretKey::random(&mut rng);
    let pk = sk.public_key();
    let msg = [0u8; 32];
    let sig = ctx.sign(&msg, &sk).expect("sign");
    let mut scratch = ScratchSpace::new(DEFAULT_SCRATCH_SIZE);

    assert!(matches!(
        ctx.pubkey_combine(&[]),
        Err(MusigError::IllegalArgument(_))
    ));
    assert!(ctx.pubkey_combine_aggregate(&[]).is_err());
    assert!(ctx.tweak_secret_key(&sk, &[], 0).is_err());
    assert!(ctx.tweak_secret_key(&sk, &[pk], 1).is_err());
    assert_eq!(sink.count(), 4);

    let sigs = [sig, sig];
    let messages = [msg];
    let pubkeys = [pk, pk];
    let ragged = SignatureBatch::new(&sigs, &messages, &pubkeys);
    assert!(
        ctx.verify_batch(&mut scratch, &ragged, &TaprootBatch::empty())
            .is_err()
    );

    let internal_keys = [pk];
    let commitments = [[0u8; 32]];
    let ragged_taproot = TaprootBatch::new(&internal_keys, &[], &commitments);
    assert!(
        ctx.verify_batch(&mut scratch, &SignatureBatch::empty(), &ragged_taproot)
            .is_err()
    );
    assert_eq!(sink.count(), 6);
    assert_eq!(scratch.frame_count(), 0);

    sink.reset();
    assert_eq!(
        ctx.pubkey_tweak_add(&pk, &[0xff; 32]),
        Err(MusigError::InvalidTweak)
    );
    assert_eq!(sink.count(), 0);
}

#[test]
fn test_empty_batch() {
    let ctx = Context::verification_only();
    let mut scratch = ScratchSpace::new(0);
    assert!(
        ctx.verify_batch(&mut scratch, &SignatureBatch::empty(), &TaprootBatch::empty())
            .expect("verify")
    );
}

#[test]
fn test_batch_verify_large() {
    let ctx = Context::all();
    let mut rng = StdRng::seed_from_u64(42);
    let fixture = Fixture::new(&ctx, &mut rng, N_SIGS, N_TAPROOT);
    let mut scratch = ScratchSpace::new(batch_scratch_size(N_SIGS, N_TAPROOT));

    assert!(
        ctx.verify_batch(&mut scratch, &fixture.signatures(), &fixture.taproot())
            .expect("verify")
    );
    assert!(
        ctx.verify_batch(&mut scratch, &fixture.signatures(), &TaprootBatch::empty())
            .expect("verify")
    );
    assert!(
        ctx.verify_batch(&mut scratch, &SignatureBatch::empty(), &fixture.taproot())
            .expect("verify")
    );
    assert_eq!(scratch.frame_count(), 0);
}

#[test]
fn test_batch_rejects_any_tampering() {
    let ctx = Context::all();
    let mut rng = StdRng::seed_from_u64(7);
    let fixture = Fixture::new(&ctx, &mut rng, 16, 4);
    let mut scratch = ScratchSpace::new(batch_scratch_size(16, 4));

    let mut sigs = fixture.sigs.clone();
    sigs[9].s[31] ^= 1;
    let tampered = SignatureBatch::new(&sigs, &fixture.messages, &fixture.pubkeys);
    assert!(
        !ctx.verify_batch(&mut scratch, &tampered, &fixture.taproot())
            .expect("verify")
    );

    let mut messages = fixture.messages.clone();
    messages[0][0] ^= 1;
    let tampered = SignatureBatch::new(&fixture.sigs, &messages, &fixture.pubkeys);
    assert!(
        !ctx.verify_batch(&mut scratch, &tampered, &fixture.taproot())
            .expect("verify")
    );

    let mut commitments = fixture.commitments.clone();
    commitments[3][5] ^= 1;
    let tampered = TaprootBatch::new(
        &fixture.internal_keys,
        &fixture.output_keys,
        &commitments,
    );
    assert!(
        !ctx.verify_batch(&mut scratch, &fixture.signatures(), &tampered)
            .expect("verify")
    );

    let mut output_keys = fixture.output_keys.clone();
    output_keys.swap(0, 1);
    let tampered = TaprootBatch::new(&fixture.internal_keys, &output_keys, &fixture.commitments);
    assert!(
        !ctx.verify_batch(&mut scratch, &fixture.signatures(), &tampered)
            .expect("verify")
    );
    assert_eq!(scratch.frame_count(), 0);
}

#[test]
fn test_batch_scratch_thresholds() {
    let ctx = Context::all();
    let mut rng = StdRng::seed_from_u64(8);
    let fixture = Fixture::new(&ctx, &mut rng, 4, 2);
    let staging = batch_staging_size(4, 2);
    let total = batch_scratch_size(4, 2);

    // Too small for the staging frame, then for the working frame.
    for capacity in [0, staging - 1, staging, total - 1] {
        let mut scratch = ScratchSpace::new(capacity);
        let ok = ctx
            .verify_batch(&mut scratch, &fixture.signatures(), &fixture.taproot())
            .expect("verify");
        assert!(!ok, "capacity {capacity}");
        assert_eq!(scratch.frame_count(), 0);
    }

    let mut scratch = ScratchSpace::new(total);
    assert!(
        ctx.verify_batch(&mut scratch, &fixture.signatures(), &fixture.taproot())
            .expect("verify")
    );
    assert_eq!(scratch.frame_count(), 0);
}

#[test]
fn test_batch_tweak_hash_failures() {
    let ctx = Context::all();
    let mut rng = StdRng::seed_from_u64(9);
    let fixture = Fixture::new(&ctx, &mut rng, 3, 2);
    let mut scratch = ScratchSpace::new(batch_scratch_size(3, 2));

    assert!(
        !ctx.verify_batch_with(
            &mut scratch,
            &fixture.signatures(),
            &fixture.taproot(),
            &failing_tweak_hash
        )
        .expect("verify")
    );
    assert!(
        !ctx.verify_batch_with(
            &mut scratch,
            &fixture.signatures(),
            &fixture.taproot(),
            &overflowing_tweak_hash
        )
        .expect("verify")
    );

    // The tweak hash is never consulted without taproot rows.
    assert!(
        ctx.verify_batch_with(
            &mut scratch,
            &fixture.signatures(),
            &TaprootBatch::empty(),
            &failing_tweak_hash
        )
        .expect("verify")
    );
    assert_eq!(scratch.frame_count(), 0);
}

#[test]
fn test_taproot_tweak() {
    let ctx = Context::all();
    let sk = SecretKey::from_bytes(b" untweaked secret key untweaked ").expect("secret key");
    let internal = sk.public_key();
    let commitment = *b"scripty mcscriptface            ";

    let output = ctx.taproot_tweak(&internal, &commitment).expect("tweak");
    let tweak = taproot_hash_default(&internal, &commitment);
    assert_eq!(ctx.pubkey_tweak_add(&internal, &tweak), Ok(output));

    let tweaked_sk = sk.add_tweak(&tweak).expect("tweak secret key");
    assert_eq!(tweaked_sk.public_key(), output);

    let msg = sha256(b"spend");
    let sig = ctx.sign(&msg, &tweaked_sk).expect("sign");
    assert!(ctx.verify_1(&sig, &msg, &output).expect("verify"));

    let internal_keys = [internal];
    let output_keys = [output];
    let commitments = [commitment];
    let taproot = TaprootBatch::new(&internal_keys, &output_keys, &commitments);
    let mut scratch = ScratchSpace::new(batch_scratch_size(0, 1));
    assert!(
        ctx.verify_batch(&mut scratch, &SignatureBatch::empty(), &taproot)
            .expect("verify")
    );

    let wrong_outputs = [internal];
    let taproot = TaprootBatch::new(&internal_keys, &wrong_outputs, &commitments);
    assert!(
        !ctx.verify_batch(&mut scratch, &SignatureBatch::empty(), &taproot)
            .expect("verify")
    );
}

#[test]
fn test_taproot_tweak_hash_failures() {
    let ctx = Context::all();
    let mut rng = StdRng::seed_from_u64(10);
    let internal = SecretKey::random(&mut rng).public_key();
    let commitment = [4u8; 32];

    assert_eq!(
        ctx.taproot_tweak_with(&internal, &commitment, &failing_tweak_hash),
        Err(MusigError::TweakHashFailed)
    );
    assert_eq!(
        ctx.taproot_tweak_with(&internal, &commitment, &overflowing_tweak_hash),
        Err(MusigError::InvalidTweak)
    );
    assert_eq!(
        ctx.taproot_tweak_with(&internal, &commitment, &TapTweakHash),
        ctx.taproot_tweak(&internal, &commitment)
    );
}

#[test]
fn test_tweak_add_to_infinity() {
    let ctx = Context::all();
    let mut one = [0u8; 32];
    one[31] = 1;
    let generator = SecretKey::from_bytes(&one).expect("one").public_key();

    // G + (n - 1)G is the point at infinity.
    let minus_one = hex32("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140");
    assert_eq!(
        ctx.pubkey_tweak_add(&generator, &minus_one),
        Err(MusigError::InfiniteResult)
    );
}

#[test]
fn test_aggregation_consistency() {
    let ctx = Context::all();
    let mut rng = StdRng::seed_from_u64(12);
    let sks: Vec<SecretKey> = (0..5).map(|_| SecretKey::random(&mut rng)).collect();
    let pks: Vec<PublicKey> = sks.iter().map(SecretKey::public_key).collect();

    let combined = ctx.pubkey_combine(&pks).expect("combine");
    assert_eq!(combined.tweaked_keys.len(), pks.len());
    assert_eq!(combined.coefficients.len(), pks.len());
    assert_eq!(
        ctx.pubkey_combine_aggregate(&pks),
        Ok(combined.aggregate)
    );

    let msg = sha256(b"aggregate me");
    let mut sigs = Vec::new();
    let mut sum: Option<SecretKey> = None;
    for (i, sk) in sks.iter().enumerate() {
        let tweaked = Context::none()
            .tweak_secret_key(sk, &pks, i)
            .expect("tweak secret key");
        assert_eq!(tweaked.public_key(), combined.tweaked_keys[i]);
        assert_ne!(combined.coefficients[i], [0u8; 32]);
        sigs.push(ctx.sign(&msg, &tweaked).expect("sign"));

        sum = Some(match sum {
            None => tweaked,
            Some(acc) => acc.add_tweak(&tweaked.to_bytes()).expect("sum"),
        });
    }
    let aggregate_sk = sum.expect("at least one key");
    assert_eq!(aggregate_sk.public_key(), combined.aggregate);

    let messages = vec![msg; sks.len()];
    let batch = SignatureBatch::new(&sigs, &messages, &combined.tweaked_keys);
    let mut scratch = ScratchSpace::new(batch_scratch_size(sigs.len(), 0));
    assert!(
        ctx.verify_batch(&mut scratch, &batch, &TaprootBatch::empty())
            .expect("verify")
    );
}

#[test]
fn test_aggregation_binds_key_order() {
    let ctx = Context::verification_only();
    let mut rng = StdRng::seed_from_u64(13);
    let pks: Vec<PublicKey> = (0..3)
        .map(|_| SecretKey::random(&mut rng).public_key())
        .collect();

    let mut reordered = pks.clone();
    reordered.swap(0, 2);

    let a = ctx.pubkey_combine_aggregate(&pks).expect("combine");
    let b = ctx.pubkey_combine_aggregate(&reordered).expect("combine");
    assert_ne!(a, b);
    assert_eq!(ctx.pubkey_combine_aggregate(&pks), Ok(a));
}

#[test]
fn test_single_key_aggregate_is_weighted() {
    let ctx = Context::all();
    let mut rng = StdRng::seed_from_u64(14);
    let sk = SecretKey::random(&mut rng);
    let pks = [sk.public_key()];

    let combined = ctx.pubkey_combine(&pks).expect("combine");
    assert_ne!(combined.aggregate, pks[0]);
    assert_eq!(combined.tweaked_keys, vec![combined.aggregate]);
    assert_eq!(
        ctx.tweak_secret_key(&sk, &pks, 0).expect("tweak").public_key(),
        combined.aggregate
    );
}
