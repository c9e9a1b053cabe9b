use musig::{
    Context, MusigSignature, PublicKey, ScratchSpace, SecretKey, SignatureBatch, TaprootBatch,
    batch_scratch_size,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() {
    let ctx = Context::all();
    let mut rng = StdRng::seed_from_u64(42);

    let sks: Vec<SecretKey> = (0..3).map(|_| SecretKey::random(&mut rng)).collect();
    let pks: Vec<PublicKey> = sks.iter().map(SecretKey::public_key).collect();
    let combined = ctx.pubkey_combine(&pks).expect("combine");

    let internal_key = combined.aggregate;
    let commitment = musig::sha256(b"hello musig");
    let output_key = ctx
        .taproot_tweak(&internal_key, &commitment)
        .expect("taproot tweak");

    let msg = musig::sha256(b"spend output");
    let sigs: Vec<MusigSignature> = sks
        .iter()
        .enumerate()
        .map(|(i, sk)| {
            let tweaked = ctx.tweak_secret_key(sk, &pks, i).expect("tweak");
            ctx.sign(&msg, &tweaked).expect("sign")
        })
        .collect();

    let sig_bytes = bincode::serialize(&sigs).expect("serialize sigs");
    let key_bytes = bincode::serialize(&combined.tweaked_keys).expect("serialize keys");
    let sigs2: Vec<MusigSignature> = bincode::deserialize(&sig_bytes).expect("deserialize sigs");
    let keys2: Vec<PublicKey> = bincode::deserialize(&key_bytes).expect("deserialize keys");

    let messages = vec![msg; sigs2.len()];
    let internal_keys = [internal_key];
    let output_keys = [output_key];
    let commitments = [commitment];
    let mut scratch = ScratchSpace::new(batch_scratch_size(sigs2.len(), 1));

    let ok = ctx
        .verify_batch(
            &mut scratch,
            &SignatureBatch::new(&sigs2, &messages, &keys2),
            &TaprootBatch::new(&internal_keys, &output_keys, &commitments),
        )
        .expect("verify");
    assert!(ok);

    println!("aggregate key: {internal_key}");
    println!("output key:    {output_key}");
}
