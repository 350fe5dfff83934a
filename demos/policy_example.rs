use std::collections::BTreeSet;

use rand::{SeedableRng, rngs::StdRng};
use tracing::{info, warn};
use tracing_subscriber::fmt;

use tabe::{
    AccessTree, BackendConfig, BackendId, BlstBackend, CpAbe, CpDecryptKey, CurveId, Error, KpAbe,
    KpAbeParameters, Message, Policy,
};

type BE = BlstBackend;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    fmt()
        .with_max_level(tracing::Level::INFO)
        .with_span_events(fmt::format::FmtSpan::ENTER | fmt::format::FmtSpan::CLOSE)
        .with_target(false)
        .with_ansi(false)
        .init();

    let mut rng = StdRng::seed_from_u64(42);
    let backend = BackendConfig::new(BackendId::Blst, CurveId::Bls12_381);

    key_policy(&mut rng, &backend)?;
    ciphertext_policy(&mut rng, &backend)?;
    Ok(())
}

/// Documents are tagged with departments; each key names the departments it
/// may read.
fn key_policy(rng: &mut StdRng, backend: &BackendConfig) -> Result<(), Error> {
    let params = KpAbeParameters::new(
        backend.clone(),
        ["finance", "legal", "audit", "engineering"],
    )?;
    let abe = KpAbe::<BE>::new(&params)?;
    let (pk, msk) = abe.setup(rng);

    // finance AND (legal OR audit)
    let policy = Policy::and(vec![
        abe.leaf("finance")?,
        Policy::or(vec![abe.leaf("legal")?, abe.leaf("audit")?]),
    ]);
    let dk = abe.keygen(rng, &AccessTree::from_policy(&policy)?, &msk)?;

    let session = Message::<BE>::random(rng);
    let payload = b"Q3 audit findings";
    let sealed = session.seal(payload)?;

    for tags in [["finance", "audit"], ["legal", "engineering"]] {
        let attributes: BTreeSet<usize> = tags
            .iter()
            .filter_map(|label| abe.attribute_id(label))
            .collect();
        let ct = abe.encrypt(rng, &session, &attributes, &pk)?;
        match abe.decrypt(&ct, &dk) {
            Ok(recovered) => {
                let plain = recovered.open(&sealed)?;
                info!(?tags, matches = (plain == payload), "key-policy decryption succeeded");
            }
            Err(Error::PolicyNotSatisfied) => warn!(?tags, "key-policy decryption refused"),
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

/// The policy travels with the ciphertext; a key holder delegates a narrower
/// key to a colleague.
fn ciphertext_policy(rng: &mut StdRng, backend: &BackendConfig) -> Result<(), Error> {
    let abe = CpAbe::<BE>::new(backend)?;
    let (pk, msk) = abe.setup(rng);

    // ("doctor" OR "nurse") AND ("cardiology" AND "on-call")
    let policy = Policy::and(vec![
        Policy::or(vec![Policy::leaf("doctor"), Policy::leaf("nurse")]),
        Policy::and(vec![Policy::leaf("cardiology"), Policy::leaf("on-call")]),
    ]);
    let tree: AccessTree<String> = AccessTree::from_policy(&policy)?;
    info!(policy = %String::from_utf8_lossy(&tree.encode()?), "encrypting under policy");

    let session = Message::<BE>::random(rng);
    let ct = abe.encrypt(rng, &pk, &session, &tree)?;

    let attributes: BTreeSet<String> = ["doctor", "cardiology", "on-call", "radiology"]
        .map(String::from)
        .into();
    let dk = abe.keygen(rng, &msk, &attributes)?;
    report(&abe, &ct, &dk, &session, "issued key");

    let subset: BTreeSet<String> = ["doctor", "cardiology"].map(String::from).into();
    let delegated = abe.delegate(rng, &dk, &subset)?;
    report(&abe, &ct, &delegated, &session, "delegated key");

    let bytes = dk.to_bytes()?;
    info!(bytes = bytes.len(), "serialized decryption key");
    let restored = CpDecryptKey::<BE>::from_bytes(&bytes)?;
    report(&abe, &ct, &restored, &session, "restored key");
    Ok(())
}

fn report(
    abe: &CpAbe<BE>,
    ct: &tabe::CpCiphertext<BE>,
    dk: &CpDecryptKey<BE>,
    expected: &Message<BE>,
    name: &str,
) {
    match abe.decrypt(ct, dk) {
        Ok(recovered) => info!(key = name, matches = (recovered == *expected), "decrypted"),
        Err(err) => warn!(key = name, %err, "decryption failed"),
    }
}
