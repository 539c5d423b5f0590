//! FQN ⇄ denormalized-name conversion shared by both hash generators.

/// Strip the `/msg/` segment: `package/msg/Name` → `package/Name`. Used in
/// canonical legacy text (`MSG: <denormalized name>` separator headers)
/// where the modern `/msg/` infix has no equivalent.
pub fn denormalize_msgtype(fqn: &str) -> String {
    let parts: Vec<&str> = fqn.split('/').collect();
    if parts.len() == 3 && parts[1] == "msg" {
        format!("{}/{}", parts[0], parts[2])
    } else {
        fqn.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_msg_segment() {
        assert_eq!(denormalize_msgtype("std_msgs/msg/Header"), "std_msgs/Header");
    }

    #[test]
    fn leaves_unqualified_names_unchanged() {
        assert_eq!(denormalize_msgtype("not/a/valid/fqn"), "not/a/valid/fqn");
    }
}
