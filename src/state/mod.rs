pub mod backup_form;
