mod test_reclamation;
