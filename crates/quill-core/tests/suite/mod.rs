mod edit_props;
