//! Built-in startup scripts
//!
//! Script bodies placed into instance metadata by the instance composers.
//! They are Tera templates: the composer fills in the provisioning user,
//! credentials, and the imported per-role setup script before embedding the
//! result under the `startup-script` metadata key.

/// Node bootstrap: create the provisioning user, run the imported setup
/// script, then append the project-level SSH keys once setup succeeded.
pub const NODE_STARTUP: &str = r#"#!/bin/bash
useradd -m -s /bin/bash {{ username }}
echo {{ username }}:{{ password }} | chpasswd
usermod -aG sudo {{ username }}
mkdir ~{{ username }}/.ssh
echo {{ ssh_pubkey }} > ~{{ username }}/.ssh/authorized_keys
chown -R {{ username }} ~{{ username }}/.ssh
chmod -R go-rwx ~{{ username }}/.ssh
echo "Done adding new user {{ username }}"
{{ setup_script }}
sleep 60
result=$?
if [ $result -eq 0 ]; then
  curl --connect-timeout 120 --max-time 120 --retry 5 --retry-delay 0 --retry-max-time 60 -sfH "Metadata-Flavor: Google" "http://metadata.google.internal/computeMetadata/v1/project/attributes/ssh-keys" | python3 -c "import sys; [print(k) for k in [key.strip().split(':')[-1] for key in sys.stdin.readlines()]]" >> ~{{ username }}/.ssh/authorized_keys
fi
"#;

/// Monitor bootstrap: same user provisioning, but the setup script runs
/// before the result check and the settle delay is shorter.
pub const MONITOR_STARTUP: &str = r#"#!/bin/bash
useradd -m -s /bin/bash {{ username }}
echo {{ username }}:{{ password }} | chpasswd
usermod -aG sudo {{ username }}
mkdir ~{{ username }}/.ssh
echo {{ ssh_pubkey }} > ~{{ username }}/.ssh/authorized_keys
chown -R {{ username }} ~{{ username }}/.ssh
chmod -R go-rwx ~{{ username }}/.ssh
echo "Done adding new user {{ username }}"
{{ setup_script }}
result=$?
sleep 30
if [ $result -eq 0 ]; then
  curl --connect-timeout 10 --max-time 5 --retry 5 --retry-delay 0 --retry-max-time 60 -sfH "Metadata-Flavor: Google" "http://metadata.google.internal/computeMetadata/v1/project/attributes/ssh-keys" | python3 -c "import sys; [print(k) for k in [key.strip().split(':')[-1] for key in sys.stdin.readlines()]]" >> ~{{ username }}/.ssh/authorized_keys
fi
"#;

/// Get the script body for a built-in script name
pub fn get_builtin_script(name: &str) -> Option<&'static str> {
    match name {
        "node-startup" => Some(NODE_STARTUP),
        "monitor-startup" => Some(MONITOR_STARTUP),
        _ => None,
    }
}

/// Check whether a script name is a built-in
pub fn is_builtin_script(name: &str) -> bool {
    get_builtin_script(name).is_some()
}
