/// Author name used when none is given: the OS user's real name, then the login name.
pub fn get_name() -> String {
    let real_name = whoami::realname();
    let real_name = real_name.trim();
    if !real_name.is_empty() {
        return real_name.to_string();
    }
    whoami::username()
}
