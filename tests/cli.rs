#![allow(deprecated)] // cargo_bin is deprecated in favor of cargo_bin_cmd! macro

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn create_vm() -> Command {
    let mut command = Command::cargo_bin("create-vm").unwrap();
    command.env_remove("RUST_LOG");
    command
}

#[test]
fn help_lists_options() {
    create_vm()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--template-name <NAME>"))
        .stdout(predicate::str::contains("--vm-namespace"))
        .stdout(predicate::str::contains("--own-pvcs"))
        .stdout(predicate::str::contains("Output format. One of: yaml|json"));
}

#[test]
fn missing_template_name_fails() {
    create_vm()
        .args(["--template-namespace", "templates", "--vm-namespace", "vms"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--template-name"));
}

#[test]
fn unknown_output_format_fails() {
    create_vm()
        .args([
            "--template-name",
            "fedora",
            "--template-namespace",
            "templates",
            "--vm-namespace",
            "vms",
            "-o",
            "xml",
        ])
        .assert()
        .failure();
}

#[test]
fn json_output_uses_last_namespaces() {
    create_vm()
        .args([
            "--template-name",
            "fedora",
            "--template-namespace",
            "first",
            "--template-namespace",
            "templates",
            "--vm-namespace",
            "vms",
            "--template-params",
            "NAME:vm1",
            "broken",
            "--own-dvs",
            "rootdisk",
            "-o",
            "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"templateNamespace\": \"templates\""))
        .stdout(predicate::str::contains("\"vmNamespace\": \"vms\""))
        .stdout(predicate::str::contains("\"NAME\": \"vm1\""))
        .stdout(predicate::str::contains("broken").not())
        .stdout(predicate::str::contains("\"name\": \"rootdisk\""));
}

#[test]
fn yaml_output_lists_disks_in_order() {
    create_vm()
        .args([
            "--template-name",
            "fedora",
            "--template-namespace",
            "templates",
            "--vm-namespace",
            "vms",
            "--dvs",
            "d2",
            "--own-pvcs",
            "p1",
            "-o",
            "yaml",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("templateName: fedora"))
        .stdout(predicate::str::is_match("(?s)- name: p1.*- name: d2").unwrap());
}

#[test]
fn no_output_flag_prints_nothing() {
    create_vm()
        .args([
            "--template-name",
            "fedora",
            "--template-namespace",
            "templates",
            "--vm-namespace",
            "vms",
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn debug_flag_logs_parsed_arguments() {
    create_vm()
        .args([
            "--template-name",
            "fedora",
            "--template-namespace",
            "templates",
            "--vm-namespace",
            "vms",
            "--debug",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("parsed arguments"));
}

#[test]
fn failed_namespace_lookup_still_logs_parsed_arguments() {
    create_vm()
        .args(["--template-name", "fedora", "--debug"])
        .env("KUBECONFIG", "/nonexistent/kubeconfig")
        .env_remove("KUBERNETES_SERVICE_HOST")
        .env_remove("KUBERNETES_SERVICE_PORT")
        .assert()
        .failure()
        .stderr(predicate::str::contains("parsed arguments"))
        .stderr(predicate::str::contains(
            "template-namespace/vm-namespace option is empty",
        ));
}

#[test]
fn missing_namespaces_come_from_kubeconfig() {
    let mut kubeconfig = tempfile::NamedTempFile::new().unwrap();
    write!(
        kubeconfig,
        r#"apiVersion: v1
kind: Config
current-context: dev
clusters:
- name: lab
  cluster:
    server: https://127.0.0.1:6443
users:
- name: admin
  user:
    token: secret
contexts:
- name: dev
  context:
    cluster: lab
    user: admin
    namespace: kubevirt-workloads
"#
    )
    .unwrap();

    create_vm()
        .args([
            "--template-name",
            "fedora",
            "--template-namespace",
            "templates",
            "-o",
            "json",
        ])
        .env("KUBECONFIG", kubeconfig.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"templateNamespace\": \"templates\""))
        .stdout(predicate::str::contains(
            "\"vmNamespace\": \"kubevirt-workloads\"",
        ));
}
