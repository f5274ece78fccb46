#![feature(test)]

extern crate test;

use base64ct::{Base64, Encoding};
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use rsa_engine::{
    pkcs8::{DecodePrivateKey, EncodePrivateKey, LineEnding},
    sha2::{Digest, Sha256},
    KeyConfig, Pkcs1v15Encrypt, Pkcs1v15Sign, RsaPrivateKey, RsaPrivateKeyPair,
};
use test::Bencher;

const SEED: &str = "c993abb954f4ad796efa851ce4276f12250633ec4a8da1d1c8f37a82b633c1b7";

const PRIVATE_KEY: &str = "\
    MIIEvAIBADANBgkqhkiG9w0BAQEFAASCBKYwggSiAgEAAoIBAQDD/UjzFPIp85KE\
    Ga4rhPYY0/8MszqrNHcyoogVXyg5MTXCee6nQPOk88HLsDM2KW7JBtvc2LDbzPVm\
    P6ZxqRsj03T3VrC4YOari460Jn9J6L4ueKvUagkxxF2XyaB7yuoblFmuTsZA98Zj\
    wAgfPA4G2PaeaxtdzWWXV4ehmGoXslKFzNnMSBLu/a+GROrWTT/5vg1jybXrppeD\
    cTeBBE+vbcv9k/Al7j6eIwCi0ObZYoEEET+3Et5hGv6w7qrH+Ds0MBhesSMmVLSm\
    vkEMaJxUcWGnIQazgghFjnFvnQkF57zJsMl/sTjm7QkA9IIxejPGvfgARbP1aAAv\
    UMtjpoULAgMBAAECggEABYwix3adUCCr0f9kFalCyfseKf7ct0HZ6d392hUCb3P8\
    IJAQ+Dz3aIDZyGkpWewcTaZbDMo5X09S1t0QWgE+Wmo+0k1q3R0pCkv98w1v5uim\
    kWwq+O0za2wydfxoBXj93V/6ldt28xnQTLx/vlqVzw3PFTbU5HfO21TH6wQEZL1D\
    rhEshddoU9a9qrqzsVFNLUiGHAvMR7YijagLl0t2LMSfeIt5qS4Rj7fCyXGzNNSx\
    01h31IfVSUT1FdWTf+fRAYF20nupqejzLjRc5srNoTrQnK7otDFYFxiwb/E2/Dte\
    I6kIr5SgscOBoQizBPL/yINgWjWHYUrMRyX+EN2sqQKBgQDOtX4Zs4QDNFT7otjL\
    D1JNIY6bcic0P86XMq6LNSV5o6JmxNDMlPD/EjVAicjOxn1LYbnzIQyuzOVrNXm0\
    +QA8dsJMyQzzNO7o6t9lLtrG+CXBKP7wmVBb8mMWve0VKNeLZyOpbOamGC1P7mPp\
    JVoRh+8DAVzKPXlEaKXXLasZHwKBgQDyuWs8b/6wv1d8WGZoXYuCkL1l/ywNidZP\
    AeBys4FXdqN6luOuCIoMpu7sOzCT7exu5pz3toB74bwVGRsSlcp3LJirb8LN4U3o\
    jkD3Tp8Gn7f7pUE43ZphU8B25ebAMBgCC5V+77HVIlo8GmLFz0M5XAslWtZ6GMmr\
    XF3HhERalQKBgEejfN15aqIVq/I94PaXC8XxgFP9PvsLthSOmxFhzOgYPvtw8JBG\
    ejNcYxpH5lFLVzcd2m0ZoiSenFAIi3Kd7WgHHJWyBAvx527Pn7aYg3f7nlIQXDKU\
    X9ZN7et+zUDNE86bYy+fr1wW+vU9wGCX8lwrCTm4aikpHvMHdZpamHavAoGADYSq\
    JkmOg8WEV9aMjY94L6NkCQQ3LeHZX7kZCQpaT8a5wCAbOhwbpCy/7cQ2Jmb/3gVW\
    BK3TZhLiaMJnMZfKGO0Q66tjzBeaQTN7BssILFRE6O0BPuuIp5cEhxqyyU1kaOjA\
    QLuUyewJ3oMRsTaj5dPsgv4WJ+KtiK+yQWRqcikCgYAwRzXzsrGK2HpkER3sEXok\
    hydDHbuqKLuT2Cqe6wyBpJPq5MyMu/T7ANmAPtJK4nvQF5RQoGdTne6/lvvwNMf2\
    ullviEZz1ehunkmoU25CgAKLXXCMmw/T8GyX6UUIqofyFGHasj/vjA8ZIpdLyKVP\
    khSri8NDQTao0i43teKIMA==";

fn get_key() -> RsaPrivateKey {
    // 2048 bits
    let der = Base64::decode_vec(PRIVATE_KEY).unwrap();
    RsaPrivateKey::from_pkcs8_der(&der).unwrap()
}

#[bench]
fn bench_rsa_1024_gen_key(b: &mut Bencher) {
    let mut rng = ChaCha8Rng::from_seed([42; 32]);
    let config = KeyConfig::new().with_min_bits(1024).unwrap();

    b.iter(|| {
        let key = RsaPrivateKey::new_with_config(&mut rng, 1024, &config).unwrap();
        test::black_box(key);
    });
}

#[bench]
fn bench_rsa_2048_gen_key(b: &mut Bencher) {
    let mut rng = ChaCha8Rng::from_seed([42; 32]);

    b.iter(|| {
        let key = RsaPrivateKey::new(&mut rng, 2048).unwrap();
        test::black_box(key);
    });
}

#[bench]
fn bench_rsa_2048_pkcsv1_decrypt(b: &mut Bencher) {
    let priv_key = get_key();
    let mut rng = ChaCha8Rng::from_seed([42; 32]);
    let x = priv_key
        .to_public_key()
        .encrypt(&mut rng, Pkcs1v15Encrypt, b"testing")
        .unwrap();

    b.iter(|| {
        let res = priv_key.decrypt(Pkcs1v15Encrypt, &x).unwrap();
        test::black_box(res);
    });
}

#[bench]
fn bench_rsa_2048_pkcsv1_sign(b: &mut Bencher) {
    let priv_key = get_key();
    let digest = Sha256::digest(b"testing").to_vec();

    b.iter(|| {
        let res = priv_key.sign(Pkcs1v15Sign::new::<Sha256>(), &digest).unwrap();
        test::black_box(res);
    });
}

#[bench]
fn bench_rsa_2048_pkcsv1_sign_blinded(b: &mut Bencher) {
    let priv_key = get_key();
    let digest = Sha256::digest(b"testing").to_vec();
    let mut rng = ChaCha8Rng::from_seed([42; 32]);

    b.iter(|| {
        let res = priv_key
            .sign_with_rng(&mut rng, Pkcs1v15Sign::new::<Sha256>(), &digest)
            .unwrap();
        test::black_box(res);
    });
}

#[bench]
fn bench_key_pair_encrypt_decrypt(b: &mut Bencher) {
    let priv_key = get_key();
    let pem = priv_key.to_pkcs8_pem(LineEnding::LF).unwrap();
    let mut private_pair = RsaPrivateKeyPair::new();
    private_pair.from_pem(&pem).unwrap();
    let public_pair = private_pair.public_pair().unwrap();

    b.iter(|| {
        let ciphertext = public_pair.encrypt("testing", SEED).unwrap();
        let res = private_pair.decrypt(&ciphertext).unwrap();
        test::black_box(res);
    });
}
