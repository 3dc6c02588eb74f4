use md5::{Digest, Md5};
use shared_kernel::string_key;

string_key!(Fingerprint);

impl Fingerprint {
    /// Lowercase hex MD5 digest of the rendered notification.
    pub fn of(text: &str) -> Self {
        Fingerprint(format!("{:x}", Md5::digest(text.as_bytes())))
    }
}

#[cfg(test)]
mod tests {
    use super::Fingerprint;

    #[test]
    fn test_fingerprint_is_the_md5_hex_digest() {
        assert_eq!(
            Fingerprint::of(""),
            Fingerprint::from("d41d8cd98f00b204e9800998ecf8427e")
        );
        assert_eq!(
            Fingerprint::of("abc"),
            Fingerprint::from("900150983cd24fb0d6963f7d28e17f72")
        );
    }

    #[test]
    fn test_fingerprint_depends_only_on_the_text() {
        let text = String::from("Center Name: Cooper Hospital");
        let copy = text.clone();
        assert_eq!(Fingerprint::of(&text), Fingerprint::of(&copy));
        assert_ne!(Fingerprint::of(&text), Fingerprint::of("Center Name: Nesco"));
    }
}
