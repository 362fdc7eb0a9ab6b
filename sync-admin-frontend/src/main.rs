fn main() {
    sync_admin_frontend::mount();
}
